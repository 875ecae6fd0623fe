//! # Pricing
//!
//! $$
//! V_0=e^{-rT}\,\mathbb E^{\mathbb Q}\!\left[\Pi(S_T)\right]
//! $$
//!
pub mod bsm;
