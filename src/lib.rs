//! # warrant-hedge
//!
//! $$
//! C^{\text{mkt}} \xrightarrow{\ \text{Newton}\ } \sigma_{\text{impl}} \xrightarrow{\ \text{BS}\ } (\,W,\ \Delta\,) \xrightarrow{\ \text{rebalance}\ } (n_S,\ n_B)
//! $$
//!
//! Black-Scholes pricing of listed options and warrants, implied volatility by
//! Newton-Raphson and a self-financing delta hedge driven by a quote series.
//!
//! - [`quant::pricing::bsm`]: closed-form prices, delta and vega
//! - [`quant::calibration::implied_vol`]: bounded Newton-Raphson solver
//! - [`quant::instrument`]: option / warrant priced off one observation
//! - [`quant::hedge`]: the replicating portfolio
//! - [`quant::market`]: contract terms, quotes, calendars and quote sources

pub mod quant;

pub use quant::calibration::implied_vol::ImpliedVolSolver;
pub use quant::calibration::implied_vol::ImpliedVolatility;
pub use quant::calibration::implied_vol::SolverConfig;
pub use quant::error::HedgeError;
pub use quant::hedge::HedgeConfig;
pub use quant::hedge::HedgePortfolio;
pub use quant::instrument::Instrument;
pub use quant::instrument::InstrumentKind;
pub use quant::pricing::bsm::BSMPricer;
pub use quant::traits::PricerExt;
pub use quant::OptionType;
