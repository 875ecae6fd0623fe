//! # Black-Scholes
//!
//! $$
//! d_1=\frac{\ln(S/K)+(r+\tfrac12\sigma^2)T}{\sigma\sqrt T},\quad d_2=d_1-\sigma\sqrt T
//! $$
//!
//! $$
//! C=S\,\Phi(d_1)-Ke^{-rT}\Phi(d_2),\qquad P=Ke^{-rT}\Phi(-d_2)-S\,\Phi(-d_1)
//! $$
//!
//! Prices are built from `S`, `d1`, `d2` and the normal CDF values rounded to five
//! decimals so that model prices line up with exchange quotes digit for digit.
//! Vega and the other Greeks are unrounded.
use statrs::distribution::Continuous;
use statrs::distribution::ContinuousCDF;
use statrs::distribution::Normal;

use crate::quant::error::ensure_finite;
use crate::quant::error::ensure_positive;
use crate::quant::error::HedgeError;
use crate::quant::error::Result;
use crate::quant::traits::PricerExt;
use crate::quant::OptionType;

/// Smallest accepted time to maturity in years. Below this `d1` blows up.
pub const MIN_TAU: f64 = 1e-6;

/// Decimal digits kept by the rounded pricing path.
pub const PRICE_DECIMALS: i32 = 5;

/// Round to [`PRICE_DECIMALS`] digits from the exact decimal expansion of `x`.
///
/// Scaling by `1e5` first would move near-ties such as `1.364015` across the
/// midpoint, so the digits come from the correctly rounded decimal string and
/// are parsed back to the nearest `f64`.
#[inline]
pub fn round5(x: f64) -> f64 {
  format!("{:.*}", PRICE_DECIMALS as usize, x)
    .parse()
    .unwrap_or(x)
}

#[derive(Debug, Clone, Copy)]
pub struct BSMPricer {
  /// Underlying price
  pub s: f64,
  /// Volatility
  pub v: f64,
  /// Strike price
  pub k: f64,
  /// Risk-free rate
  pub r: f64,
  /// Time to maturity in years
  pub tau: f64,
  /// Option type
  pub option_type: OptionType,
}

impl BSMPricer {
  pub fn new(s: f64, v: f64, k: f64, r: f64, tau: f64, option_type: OptionType) -> Self {
    Self {
      s,
      v,
      k,
      r,
      tau,
      option_type,
    }
  }

  pub fn builder(s: f64, v: f64, k: f64, r: f64) -> BSMPricerBuilder {
    BSMPricerBuilder {
      s,
      v,
      k,
      r,
      tau: None,
      option_type: OptionType::Call,
    }
  }
}

pub struct BSMPricerBuilder {
  s: f64,
  v: f64,
  k: f64,
  r: f64,
  tau: Option<f64>,
  option_type: OptionType,
}

impl BSMPricerBuilder {
  pub fn tau(mut self, tau: f64) -> Self {
    self.tau = Some(tau);
    self
  }
  pub fn option_type(mut self, option_type: OptionType) -> Self {
    self.option_type = option_type;
    self
  }
  pub fn build(self) -> Result<BSMPricer> {
    let tau = self
      .tau
      .ok_or_else(|| HedgeError::InvalidInput("time to maturity is not set".to_string()))?;
    let pricer = BSMPricer::new(self.s, self.v, self.k, self.r, tau, self.option_type);
    pricer.validate()?;
    Ok(pricer)
  }
}

impl PricerExt for BSMPricer {
  /// Rounded Black-Scholes price and unrounded-CDF delta for `option_type`.
  fn value(&self) -> Result<(f64, f64)> {
    self.validate()?;

    let n = Normal::default();
    let s = round5(self.s);
    let (d1, d2) = self.rounded_d1_d2(s);
    let discounted_k = self.k * (-self.r * self.tau).exp();

    let value = match self.option_type {
      OptionType::Call => (
        s * round5(n.cdf(d1)) - discounted_k * round5(n.cdf(d2)),
        n.cdf(d1),
      ),
      OptionType::Put => (
        discounted_k * round5(n.cdf(-d2)) - s * round5(n.cdf(-d1)),
        n.cdf(d1) - 1.0,
      ),
    };

    Ok(value)
  }
}

impl BSMPricer {
  /// Check the model preconditions. `r` may be zero or negative.
  pub fn validate(&self) -> Result<()> {
    ensure_positive("underlying price", self.s)?;
    ensure_positive("strike", self.k)?;
    ensure_positive("volatility", self.v)?;
    ensure_positive("time to maturity", self.tau)?;
    ensure_finite("risk-free rate", self.r)?;

    if self.tau < MIN_TAU {
      return Err(HedgeError::InvalidInput(format!(
        "time to maturity {} is below the minimum of {MIN_TAU} years",
        self.tau
      )));
    }

    Ok(())
  }

  /// Rounded call and put prices for the same inputs.
  pub fn calculate_call_put(&self) -> Result<(f64, f64)> {
    let call = Self {
      option_type: OptionType::Call,
      ..*self
    };
    let put = Self {
      option_type: OptionType::Put,
      ..*self
    };

    Ok((call.value()?.0, put.value()?.0))
  }

  /// d1 and d2 on the rounded path, `s` already rounded.
  fn rounded_d1_d2(&self, s: f64) -> (f64, f64) {
    let v_sqrt_t = self.v * self.tau.sqrt();
    let d1 = round5(((s / self.k).ln() + (self.r + 0.5 * self.v.powi(2)) * self.tau) / v_sqrt_t);
    let d2 = round5(d1 - v_sqrt_t);

    (d1, d2)
  }

  /// Unrounded d1 and d2, used by the Greeks.
  fn d1_d2(&self) -> (f64, f64) {
    let v_sqrt_t = self.v * self.tau.sqrt();
    let d1 = ((self.s / self.k).ln() + (self.r + 0.5 * self.v.powi(2)) * self.tau) / v_sqrt_t;

    (d1, d1 - v_sqrt_t)
  }

  /// Calculate the vega, S·√T·φ(d1), without rounding.
  pub fn vega(&self) -> Result<f64> {
    self.validate()?;
    let (d1, _) = self.d1_d2();
    let n = Normal::default();

    Ok(self.s * n.pdf(d1) * self.tau.sqrt())
  }

  /// Calculate the gamma
  pub fn gamma(&self) -> Result<f64> {
    self.validate()?;
    let (d1, _) = self.d1_d2();
    let n = Normal::default();

    Ok(n.pdf(d1) / (self.s * self.v * self.tau.sqrt()))
  }

  /// Calculate the theta (per year)
  pub fn theta(&self) -> Result<f64> {
    self.validate()?;
    let (d1, d2) = self.d1_d2();
    let n = Normal::default();

    let exp_rt = (-self.r * self.tau).exp();
    let decay = -self.s * n.pdf(d1) * self.v / (2.0 * self.tau.sqrt());

    Ok(match self.option_type {
      OptionType::Call => decay - self.r * self.k * exp_rt * n.cdf(d2),
      OptionType::Put => decay + self.r * self.k * exp_rt * n.cdf(-d2),
    })
  }

  /// Calculate the rho
  pub fn rho(&self) -> Result<f64> {
    self.validate()?;
    let (_, d2) = self.d1_d2();
    let n = Normal::default();

    let k_t_exp_rt = self.k * self.tau * (-self.r * self.tau).exp();

    Ok(match self.option_type {
      OptionType::Call => k_t_exp_rt * n.cdf(d2),
      OptionType::Put => -k_t_exp_rt * n.cdf(-d2),
    })
  }
}
