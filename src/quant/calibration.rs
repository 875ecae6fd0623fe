//! # Calibration
//!
//! $$
//! \sigma^\*:\ C^{\text{BS}}(S,K,T,r,\sigma^\*) = C^{\text{mkt}}
//! $$
//!
pub mod implied_vol;
