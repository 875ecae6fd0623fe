//! # Instruments
//!
//! $$
//! W = \frac{C^{\text{BS}}(S,K,T,r,\sigma)}{e},\qquad \Delta_W = \Delta_C
//! $$
//!
//! An option or a warrant priced off one observation. The style is fixed when the
//! instrument is built. Without a supplied volatility the implied one is solved on
//! first use and kept for the life of the instance.
use std::cell::OnceCell;

use tracing::debug;
use tracing::warn;

use crate::quant::calibration::implied_vol::ImpliedVolSolver;
use crate::quant::calibration::implied_vol::SolverConfig;
use crate::quant::error::ensure_positive;
use crate::quant::error::Result;
use crate::quant::market::ContractTerms;
use crate::quant::market::Observation;
use crate::quant::pricing::bsm::BSMPricer;
use crate::quant::traits::PricerExt;
use crate::quant::OptionType;

/// Plain option or warrant with an entitlement ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InstrumentKind {
  Option,
  Warrant { entitlement: f64 },
}

impl InstrumentKind {
  /// Derivative units per underlying share.
  pub fn entitlement(&self) -> f64 {
    match *self {
      Self::Option => 1.0,
      Self::Warrant { entitlement } => entitlement,
    }
  }
}

#[derive(Clone, Debug)]
pub struct Instrument {
  kind: InstrumentKind,
  option_type: OptionType,
  /// Observed derivative price
  quote: f64,
  /// Underlying price
  s: f64,
  /// Strike price
  k: f64,
  /// Time to maturity in years
  tau: f64,
  /// Risk-free rate
  r: f64,
  sigma: OnceCell<f64>,
  solver: ImpliedVolSolver,
}

impl Instrument {
  #[allow(clippy::too_many_arguments)]
  pub fn new(
    kind: InstrumentKind,
    option_type: OptionType,
    quote: f64,
    s: f64,
    k: f64,
    tau: f64,
    r: f64,
    sigma: Option<f64>,
    config: SolverConfig,
  ) -> Result<Self> {
    ensure_positive("derivative quote", quote)?;
    ensure_positive("entitlement ratio", kind.entitlement())?;
    BSMPricer::new(s, sigma.unwrap_or(config.initial_guess), k, r, tau, option_type).validate()?;

    Ok(Self {
      kind,
      option_type,
      quote,
      s,
      k,
      tau,
      r,
      sigma: sigma.map(OnceCell::from).unwrap_or_default(),
      solver: ImpliedVolSolver::new(config),
    })
  }

  pub fn option(
    quote: f64,
    s: f64,
    k: f64,
    tau: f64,
    r: f64,
    option_type: OptionType,
    sigma: Option<f64>,
  ) -> Result<Self> {
    Self::new(
      InstrumentKind::Option,
      option_type,
      quote,
      s,
      k,
      tau,
      r,
      sigma,
      SolverConfig::default(),
    )
  }

  #[allow(clippy::too_many_arguments)]
  pub fn warrant(
    quote: f64,
    s: f64,
    k: f64,
    tau: f64,
    r: f64,
    option_type: OptionType,
    entitlement: f64,
    sigma: Option<f64>,
  ) -> Result<Self> {
    Self::new(
      InstrumentKind::Warrant { entitlement },
      option_type,
      quote,
      s,
      k,
      tau,
      r,
      sigma,
      SolverConfig::default(),
    )
  }

  /// Warrant on `terms` priced off `observation`, volatility left to the solver.
  pub fn from_terms(
    terms: &ContractTerms,
    observation: &Observation,
    tau: f64,
    r: f64,
    config: SolverConfig,
  ) -> Result<Self> {
    Self::new(
      InstrumentKind::Warrant {
        entitlement: terms.entitlement,
      },
      terms.option_type,
      observation.quote,
      observation.spot,
      terms.strike,
      tau,
      r,
      None,
      config,
    )
  }

  /// Volatility, solving for it against the quote on first call.
  ///
  /// The solver matches the quote against the unscaled model price, so an option
  /// and a warrant on the same quote share one volatility.
  pub fn sigma(&self) -> Result<f64> {
    if let Some(sigma) = self.sigma.get() {
      return Ok(*sigma);
    }

    let result = self.solver.solve(
      self.quote,
      self.s,
      self.k,
      self.tau,
      self.r,
      self.option_type,
    )?;

    let sigma = if self.solver.config().strict {
      result.into_converged()?
    } else {
      if !result.is_converged() {
        warn!(
          sigma = result.sigma(),
          iterations = result.iterations(),
          "accepting unconverged implied volatility"
        );
      }
      result.sigma()
    };
    debug!(sigma, quote = self.quote, spot = self.s, "implied volatility solved");

    Ok(*self.sigma.get_or_init(|| sigma))
  }

  pub fn is_solved(&self) -> bool {
    self.sigma.get().is_some()
  }

  /// Unscaled per-share pricer at the instrument's volatility.
  pub fn pricer(&self) -> Result<BSMPricer> {
    Ok(BSMPricer::new(
      self.s,
      self.sigma()?,
      self.k,
      self.r,
      self.tau,
      self.option_type,
    ))
  }

  pub fn kind(&self) -> InstrumentKind {
    self.kind
  }

  pub fn option_type(&self) -> OptionType {
    self.option_type
  }

  pub fn entitlement(&self) -> f64 {
    self.kind.entitlement()
  }

  pub fn quote(&self) -> f64 {
    self.quote
  }

  pub fn spot(&self) -> f64 {
    self.s
  }

  pub fn tau(&self) -> f64 {
    self.tau
  }
}

impl PricerExt for Instrument {
  /// Price per derivative unit and per-share delta.
  fn value(&self) -> Result<(f64, f64)> {
    let (price, delta) = self.pricer()?.value()?;
    Ok((price / self.kind.entitlement(), delta))
  }
}
