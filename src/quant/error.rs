//! # Errors
//!
//! $$
//! \text{solve}:(C,S,K,T,r)\to\sigma \;\cup\; \{\text{InvalidInput},\text{NumericalDivergence},\dots\}
//! $$
//!
use chrono::NaiveDate;
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, HedgeError>;

/// Errors raised by the pricer, the implied volatility solver and the hedge portfolio.
#[derive(Debug, Error)]
pub enum HedgeError {
  /// Non-positive or non-finite model input, rejected before any computation.
  #[error("invalid input: {0}")]
  InvalidInput(String),

  /// Newton-Raphson left the admissible region (vanishing vega, non-finite or negative sigma).
  #[error("implied volatility diverged after {iterations} iterations: {reason}")]
  NumericalDivergence {
    /// Newton updates performed before the divergence was detected.
    iterations: usize,
    /// What went wrong.
    reason: String,
  },

  /// The solver ran out of iterations and the caller asked for a strict result.
  #[error("implied volatility did not converge after {iterations} iterations (last sigma {sigma:.6})")]
  MaxIterationsExceeded {
    /// Last sigma estimate.
    sigma: f64,
    /// Iterations performed.
    iterations: usize,
  },

  /// The quote series has no observation for the requested date.
  #[error("no quote {}", quote_date(.0))]
  MissingQuote(Option<NaiveDate>),

  /// Operation invoked out of the initialize-then-update sequence.
  #[error("invalid state: {0}")]
  InvalidState(&'static str),

  /// Failure reported by an external collaborator (quote source, calendar).
  #[error(transparent)]
  Source(#[from] anyhow::Error),
}

fn quote_date(date: &Option<NaiveDate>) -> String {
  match date {
    Some(date) => format!("for {date}"),
    None => "in an empty series".to_string(),
  }
}

/// Reject anything that is not a finite, strictly positive number.
pub(crate) fn ensure_positive(name: &str, value: f64) -> Result<()> {
  if value.is_finite() && value > 0.0 {
    Ok(())
  } else {
    Err(HedgeError::InvalidInput(format!(
      "{name} must be finite and > 0, got {value}"
    )))
  }
}

pub(crate) fn ensure_finite(name: &str, value: f64) -> Result<()> {
  if value.is_finite() {
    Ok(())
  } else {
    Err(HedgeError::InvalidInput(format!(
      "{name} must be finite, got {value}"
    )))
  }
}
