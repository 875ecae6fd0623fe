use std::fmt::Display;

pub mod calibration;
pub mod error;
pub mod hedge;
pub mod instrument;
pub mod market;
pub mod pricing;
pub mod traits;

/// Option type.
#[derive(Default, Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum OptionType {
  #[default]
  Call,
  Put,
}

impl Display for OptionType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      OptionType::Call => write!(f, "Call"),
      OptionType::Put => write!(f, "Put"),
    }
  }
}
