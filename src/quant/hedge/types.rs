//! # Hedge Types
//!
//! $$
//! V = n_S\,S + n_B
//! $$
//!
//! Configuration, holdings and report containers for [`super::HedgePortfolio`].
use std::fmt;

use chrono::NaiveDate;
use impl_new_derive::ImplNew;

use crate::quant::calibration::implied_vol::SolverConfig;

/// Runtime configuration for [`super::HedgePortfolio`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HedgeConfig {
  /// Risk-free rate used for pricing.
  pub risk_free_rate: f64,
  /// Trading days per year used to turn day counts into year fractions.
  pub trading_days_per_year: f64,
  /// Implied volatility solver settings.
  pub solver: SolverConfig,
}

impl Default for HedgeConfig {
  fn default() -> Self {
    Self {
      risk_free_rate: 0.0,
      trading_days_per_year: 252.0,
      solver: SolverConfig::default(),
    }
  }
}

/// Holdings of the replicating portfolio.
#[derive(ImplNew, Clone, Copy, Debug, Default, PartialEq)]
pub struct HedgeState {
  /// Units of the underlying
  pub units_underlying: f64,
  /// Units of the riskless asset
  pub units_cash: f64,
}

impl HedgeState {
  /// Mark-to-market value at spot `s`.
  #[must_use]
  pub fn value(&self, s: f64) -> f64 {
    self.units_underlying * s + self.units_cash
  }

  /// Holdings after moving to `delta` units of the underlying at spot `s`
  /// without adding or withdrawing capital.
  #[must_use]
  pub fn rebalanced(&self, delta: f64, s: f64) -> Self {
    Self {
      units_underlying: delta,
      units_cash: self.value(s) - delta * s,
    }
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PortfolioStatus {
  Uninitialized,
  Active,
}

/// Snapshot returned by [`super::HedgePortfolio::summary`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PortfolioSummary {
  pub date: NaiveDate,
  pub units_underlying: f64,
  pub units_cash: f64,
  pub portfolio_value: f64,
}

impl fmt::Display for PortfolioSummary {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "------Portfolio Summary------")?;
    writeln!(f, "Date: {}", self.date)?;
    writeln!(f, "Stock Units: {}", self.units_underlying)?;
    writeln!(f, "Riskless Units: {}", self.units_cash)?;
    writeln!(f, "Current Portfolio Value: {}", self.portfolio_value)?;
    write!(f, "-----------------------------")
  }
}

/// One initialize or rebalance step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RebalanceRecord {
  pub date: NaiveDate,
  /// Underlying price
  pub spot: f64,
  /// Quoted derivative price
  pub quote: f64,
  /// Model price per derivative unit at the implied volatility
  pub model_price: f64,
  /// Implied volatility
  pub sigma: f64,
  pub delta: f64,
  pub gamma: f64,
  /// Theta per year
  pub theta: f64,
  pub rho: f64,
  /// Time to maturity in years
  pub tau: f64,
  /// Holdings after the step
  pub state: HedgeState,
  /// Value of the previous holdings at `spot` (the quote on initialization)
  pub value_before: f64,
  /// Value of the new holdings at `spot`
  pub value_after: f64,
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;

  use super::*;

  #[test]
  fn rebalance_preserves_value() {
    let state = HedgeState::new(0.4, 12.0);
    let next = state.rebalanced(0.55, 103.0);

    assert_eq!(next.units_underlying, 0.55);
    assert_abs_diff_eq!(next.value(103.0), state.value(103.0), epsilon = 1e-12);
  }

  #[test]
  fn summary_display_lists_holdings() {
    let summary = PortfolioSummary {
      date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
      units_underlying: 0.5,
      units_cash: -10.0,
      portfolio_value: 40.0,
    };
    let text = summary.to_string();

    assert!(text.contains("Stock Units: 0.5"));
    assert!(text.contains("Riskless Units: -10"));
    assert!(text.contains("Current Portfolio Value: 40"));
  }
}
