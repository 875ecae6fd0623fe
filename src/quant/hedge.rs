//! # Hedge
//!
//! $$
//! V_t = \Delta_t S_t + B_t,\qquad B_{t} = V_{t^-} - \Delta_t S_t
//! $$
//!
//! Self-financing delta hedge of a single option or warrant with the underlying and cash.

pub mod portfolio;
pub mod types;

pub use portfolio::HedgePortfolio;
pub use types::HedgeConfig;
pub use types::HedgeState;
pub use types::PortfolioStatus;
pub use types::PortfolioSummary;
pub use types::RebalanceRecord;
