use super::error::Result;

/// Pricer trait.
pub trait PricerExt {
  /// Calculate the price and delta.
  fn value(&self) -> Result<(f64, f64)>;

  /// Calculate the price.
  fn price(&self) -> Result<f64> {
    self.value().map(|(price, _)| price)
  }

  /// Calculate the delta.
  fn delta(&self) -> Result<f64> {
    self.value().map(|(_, delta)| delta)
  }
}
