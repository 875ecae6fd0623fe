//! # Implied Volatility
//!
//! $$
//! \sigma_{i+1}=\sigma_i-\frac{C^{\text{BS}}(\sigma_i)-C^{\text{mkt}}}{\mathcal V(\sigma_i)}
//! $$
//!
//! Newton-Raphson on the rounded Black-Scholes price with the unrounded vega as
//! the derivative. The loop is bounded by [`SolverConfig::max_iterations`] and
//! reports whether it stopped on the tolerance or on the iteration cap.
use impl_new_derive::ImplNew;
use rayon::prelude::*;
use tracing::debug;
use tracing::trace;
use tracing::warn;

use crate::quant::error::ensure_positive;
use crate::quant::error::HedgeError;
use crate::quant::error::Result;
use crate::quant::pricing::bsm::BSMPricer;
use crate::quant::traits::PricerExt;
use crate::quant::OptionType;

/// Runtime configuration for [`ImpliedVolSolver`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolverConfig {
  /// Absolute price tolerance that ends the iteration.
  pub tolerance: f64,
  /// Upper bound on Newton updates.
  pub max_iterations: usize,
  /// Starting sigma.
  pub initial_guess: f64,
  /// Vega below this is treated as a flat objective.
  pub min_vega: f64,
  /// Turn [`ImpliedVolatility::MaxIterationsExceeded`] into an error for instrument callers.
  pub strict: bool,
}

impl Default for SolverConfig {
  fn default() -> Self {
    Self {
      tolerance: 1e-4,
      max_iterations: 100,
      initial_guess: 0.3,
      min_vega: 1e-8,
      strict: false,
    }
  }
}

/// Outcome of a bounded Newton-Raphson run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ImpliedVolatility {
  /// `|price(sigma) - observed| < tolerance` after `iterations` updates.
  Converged { sigma: f64, iterations: usize },
  /// The iteration cap was hit; `sigma` is the last estimate.
  MaxIterationsExceeded { sigma: f64, iterations: usize },
}

impl ImpliedVolatility {
  pub fn sigma(&self) -> f64 {
    match *self {
      Self::Converged { sigma, .. } | Self::MaxIterationsExceeded { sigma, .. } => sigma,
    }
  }

  pub fn iterations(&self) -> usize {
    match *self {
      Self::Converged { iterations, .. } | Self::MaxIterationsExceeded { iterations, .. } => {
        iterations
      }
    }
  }

  pub fn is_converged(&self) -> bool {
    matches!(self, Self::Converged { .. })
  }

  /// Accept the estimate, or refuse an unconverged one.
  pub fn into_converged(self) -> Result<f64> {
    match self {
      Self::Converged { sigma, .. } => Ok(sigma),
      Self::MaxIterationsExceeded { sigma, iterations } => {
        Err(HedgeError::MaxIterationsExceeded { sigma, iterations })
      }
    }
  }
}

/// One independent implied volatility problem.
#[derive(ImplNew, Clone, Copy, Debug)]
pub struct ImpliedVolRequest {
  /// Observed option price
  pub observed_price: f64,
  /// Underlying price
  pub s: f64,
  /// Strike price
  pub k: f64,
  /// Time to maturity in years
  pub tau: f64,
  /// Risk-free rate
  pub r: f64,
  /// Option type
  pub option_type: OptionType,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ImpliedVolSolver {
  config: SolverConfig,
}

impl ImpliedVolSolver {
  pub fn new(config: SolverConfig) -> Self {
    Self { config }
  }

  pub fn config(&self) -> &SolverConfig {
    &self.config
  }

  /// Solve for the volatility that reproduces `observed_price`.
  ///
  /// Errors with [`HedgeError::InvalidInput`] for bad inputs and
  /// [`HedgeError::NumericalDivergence`] when vega vanishes or sigma leaves `(0, ∞)`.
  pub fn solve(
    &self,
    observed_price: f64,
    s: f64,
    k: f64,
    tau: f64,
    r: f64,
    option_type: OptionType,
  ) -> Result<ImpliedVolatility> {
    ensure_positive("observed price", observed_price)?;
    ensure_positive("initial volatility guess", self.config.initial_guess)?;

    let mut sigma = self.config.initial_guess;

    for iteration in 0..self.config.max_iterations {
      let pricer = BSMPricer::new(s, sigma, k, r, tau, option_type);
      let diff = pricer.price()? - observed_price;
      trace!(iteration, sigma, diff, "newton step");

      if diff.abs() < self.config.tolerance {
        debug!(sigma, iterations = iteration, "implied volatility converged");
        return Ok(ImpliedVolatility::Converged {
          sigma,
          iterations: iteration,
        });
      }

      let vega = pricer.vega()?;
      if !vega.is_finite() || vega < self.config.min_vega {
        return Err(HedgeError::NumericalDivergence {
          iterations: iteration,
          reason: format!("vega {vega:e} at sigma {sigma} is below {:e}", self.config.min_vega),
        });
      }

      sigma -= diff / vega;
      if !sigma.is_finite() || sigma <= 0.0 {
        return Err(HedgeError::NumericalDivergence {
          iterations: iteration + 1,
          reason: format!("sigma estimate moved to {sigma}"),
        });
      }
    }

    warn!(
      sigma,
      max_iterations = self.config.max_iterations,
      "implied volatility did not converge"
    );
    Ok(ImpliedVolatility::MaxIterationsExceeded {
      sigma,
      iterations: self.config.max_iterations,
    })
  }

  pub fn solve_request(&self, request: &ImpliedVolRequest) -> Result<ImpliedVolatility> {
    self.solve(
      request.observed_price,
      request.s,
      request.k,
      request.tau,
      request.r,
      request.option_type,
    )
  }

  /// Solve independent requests in parallel. Results keep the input order.
  pub fn solve_batch(&self, requests: &[ImpliedVolRequest]) -> Vec<Result<ImpliedVolatility>> {
    requests
      .par_iter()
      .map(|request| self.solve_request(request))
      .collect()
  }
}
