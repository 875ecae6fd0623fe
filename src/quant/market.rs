//! # Market Data
//!
//! $$
//! \{(t_i, S_{t_i}, C_{t_i})\}_{i=0}^{n},\qquad t_0 > t_1 > \dots > t_n
//! $$
//!
//! Contract terms, quote observations and the collaborator traits that supply them.

pub mod calendar;
pub mod source;

use chrono::NaiveDate;

use super::error::ensure_positive;
use super::error::HedgeError;
use super::error::Result;
use super::OptionType;

pub use calendar::TradingCalendar;
pub use calendar::WeekdayCalendar;
pub use source::InMemoryQuoteSource;
pub use source::QuoteSource;

/// Exchange code used when the reference data does not name one.
pub const DEFAULT_EXCHANGE: &str = "HKEX";

/// Static terms of a listed option or warrant.
#[derive(Clone, Debug, PartialEq)]
pub struct ContractTerms {
  /// Listing code
  pub identifier: String,
  /// Strike price
  pub strike: f64,
  /// Maturity date
  pub maturity: NaiveDate,
  /// Option type
  pub option_type: OptionType,
  /// Derivative units per underlying share
  pub entitlement: f64,
  /// Exchange whose trading calendar applies
  pub exchange: String,
}

impl ContractTerms {
  pub fn new(
    identifier: impl Into<String>,
    strike: f64,
    maturity: NaiveDate,
    option_type: OptionType,
    entitlement: f64,
  ) -> Result<Self> {
    ensure_positive("strike", strike)?;
    ensure_positive("entitlement ratio", entitlement)?;

    Ok(Self {
      identifier: identifier.into(),
      strike,
      maturity,
      option_type,
      entitlement,
      exchange: DEFAULT_EXCHANGE.to_string(),
    })
  }

  pub fn with_exchange(mut self, exchange: impl Into<String>) -> Self {
    self.exchange = exchange.into();
    self
  }
}

/// One row of the quote series.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Observation {
  pub date: NaiveDate,
  /// Underlying spot price
  pub spot: f64,
  /// Quoted derivative price
  pub quote: f64,
}

impl Observation {
  pub fn new(date: NaiveDate, spot: f64, quote: f64) -> Result<Self> {
    ensure_positive("underlying price", spot)?;
    ensure_positive("derivative quote", quote)?;

    Ok(Self { date, spot, quote })
  }
}

/// Quote history ordered most-recent-first, at most one row per date.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuoteSeries {
  observations: Vec<Observation>,
}

impl QuoteSeries {
  pub fn new(mut observations: Vec<Observation>) -> Result<Self> {
    observations.sort_by(|a, b| b.date.cmp(&a.date));

    if let Some(pair) = observations.windows(2).find(|w| w[0].date == w[1].date) {
      return Err(HedgeError::InvalidInput(format!(
        "duplicate quote for {}",
        pair[0].date
      )));
    }

    Ok(Self { observations })
  }

  /// Most recent observation.
  pub fn latest(&self) -> Result<&Observation> {
    self
      .observations
      .first()
      .ok_or(HedgeError::MissingQuote(None))
  }

  pub fn get(&self, date: NaiveDate) -> Result<&Observation> {
    self
      .observations
      .binary_search_by(|o| date.cmp(&o.date))
      .map(|idx| &self.observations[idx])
      .map_err(|_| HedgeError::MissingQuote(Some(date)))
  }

  /// Observation for `date`, or the latest one when no date is given.
  pub fn resolve(&self, date: Option<NaiveDate>) -> Result<&Observation> {
    match date {
      Some(date) => self.get(date),
      None => self.latest(),
    }
  }

  /// Insert a new row, keeping the ordering.
  pub fn push(&mut self, observation: Observation) -> Result<()> {
    match self
      .observations
      .binary_search_by(|o| observation.date.cmp(&o.date))
    {
      Ok(_) => Err(HedgeError::InvalidInput(format!(
        "duplicate quote for {}",
        observation.date
      ))),
      Err(idx) => {
        self.observations.insert(idx, observation);
        Ok(())
      }
    }
  }

  pub fn len(&self) -> usize {
    self.observations.len()
  }

  pub fn is_empty(&self) -> bool {
    self.observations.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &Observation> {
    self.observations.iter()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
  }

  fn obs(d: u32, spot: f64) -> Observation {
    Observation::new(date(d), spot, 1.0).unwrap()
  }

  #[test]
  fn series_is_most_recent_first() {
    let series = QuoteSeries::new(vec![obs(1, 100.0), obs(5, 102.0), obs(4, 101.0)]).unwrap();

    assert_eq!(series.latest().unwrap().date, date(5));
    let dates: Vec<_> = series.iter().map(|o| o.date).collect();
    assert_eq!(dates, vec![date(5), date(4), date(1)]);
    assert_eq!(series.get(date(4)).unwrap().spot, 101.0);
    assert_eq!(series.resolve(None).unwrap().date, date(5));
  }

  #[test]
  fn missing_date_is_missing_quote() {
    let series = QuoteSeries::new(vec![obs(1, 100.0)]).unwrap();
    assert!(matches!(
      series.get(date(2)),
      Err(HedgeError::MissingQuote(Some(d))) if d == date(2)
    ));
    assert!(matches!(
      QuoteSeries::default().latest(),
      Err(HedgeError::MissingQuote(None))
    ));
  }

  #[test]
  fn duplicates_are_rejected() {
    assert!(QuoteSeries::new(vec![obs(1, 100.0), obs(1, 101.0)]).is_err());

    let mut series = QuoteSeries::new(vec![obs(1, 100.0)]).unwrap();
    assert!(series.push(obs(1, 99.0)).is_err());
  }

  #[test]
  fn push_keeps_order() {
    let mut series = QuoteSeries::new(vec![obs(1, 100.0), obs(6, 103.0)]).unwrap();
    series.push(obs(7, 104.0)).unwrap();
    series.push(obs(4, 101.0)).unwrap();

    let dates: Vec<_> = series.iter().map(|o| o.date).collect();
    assert_eq!(dates, vec![date(7), date(6), date(4), date(1)]);
    assert_eq!(series.len(), 4);
  }

  #[test]
  fn terms_validate_inputs() {
    let maturity = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
    assert!(ContractTerms::new("12345", 0.0, maturity, OptionType::Call, 1.0).is_err());
    assert!(ContractTerms::new("12345", 100.0, maturity, OptionType::Call, 0.0).is_err());

    let terms = ContractTerms::new("12345", 100.0, maturity, OptionType::Put, 10.0)
      .unwrap()
      .with_exchange("XNYS");
    assert_eq!(terms.exchange, "XNYS");
    assert!(Observation::new(maturity, -1.0, 1.0).is_err());
  }
}
