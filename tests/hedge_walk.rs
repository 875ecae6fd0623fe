use approx::assert_abs_diff_eq;
use chrono::NaiveDate;
use warrant_hedge::quant::hedge::PortfolioStatus;
use warrant_hedge::quant::market::ContractTerms;
use warrant_hedge::quant::market::InMemoryQuoteSource;
use warrant_hedge::quant::market::Observation;
use warrant_hedge::quant::market::QuoteSeries;
use warrant_hedge::quant::market::TradingCalendar;
use warrant_hedge::quant::market::WeekdayCalendar;
use warrant_hedge::BSMPricer;
use warrant_hedge::HedgeConfig;
use warrant_hedge::HedgeError;
use warrant_hedge::HedgePortfolio;
use warrant_hedge::Instrument;
use warrant_hedge::OptionType;
use warrant_hedge::PricerExt;

const ID: &str = "13579";

fn maturity() -> NaiveDate {
  NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
}

fn quotes(calendar: &WeekdayCalendar, spots: &[f64]) -> Vec<Observation> {
  let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
  calendar
    .trading_days_from(start)
    .zip(spots)
    .map(|(date, &spot)| {
      let tau = calendar
        .year_fraction(date, maturity(), "HKEX", 252.0)
        .unwrap();
      let raw = BSMPricer::new(spot, 0.25, 105.0, 0.01, tau, OptionType::Call)
        .price()
        .unwrap();
      Observation::new(date, spot, raw).unwrap()
    })
    .collect()
}

#[test]
fn hedge_tracks_quotes_through_a_borrowed_source() {
  let calendar = WeekdayCalendar::new();
  let observations = quotes(&calendar, &[100.0, 101.5, 99.8, 102.3, 103.1]);
  let terms = ContractTerms::new(ID, 105.0, maturity(), OptionType::Call, 10.0).unwrap();

  let mut source = InMemoryQuoteSource::new();
  source.insert(terms, QuoteSeries::new(vec![observations[0]]).unwrap());

  let config = HedgeConfig {
    risk_free_rate: 0.01,
    ..HedgeConfig::default()
  };
  let mut portfolio = HedgePortfolio::new(&source, calendar.clone(), ID, config).unwrap();

  let opening = portfolio.initialize(None).unwrap();
  assert_abs_diff_eq!(opening.portfolio_value, observations[0].quote, epsilon = 1e-12);

  let mut value = opening.portfolio_value;
  for observation in &observations[1..] {
    let held = *portfolio.state().unwrap();
    let previous_spot = portfolio.history().last().unwrap().spot;
    portfolio.record_observation(*observation).unwrap();
    let summary = portfolio.update().unwrap();

    // the hedge value moves only through the underlying position
    let expected = value + held.units_underlying * (observation.spot - previous_spot);
    assert_abs_diff_eq!(summary.portfolio_value, expected, epsilon = 1e-9);
    value = summary.portfolio_value;
  }

  assert_eq!(portfolio.status(), PortfolioStatus::Active);
  assert_eq!(portfolio.history().len(), observations.len());

  // the instrument the portfolio would build today matches the last record
  let instrument: Instrument = portfolio.instrument_at(None).unwrap();
  let last = portfolio.history().last().unwrap();
  assert_abs_diff_eq!(instrument.delta().unwrap(), last.delta, epsilon = 1e-12);
}

#[test]
fn summary_uses_requested_spot() {
  let calendar = WeekdayCalendar::new();
  let observations = quotes(&calendar, &[100.0, 104.0]);
  let terms = ContractTerms::new(ID, 105.0, maturity(), OptionType::Call, 10.0).unwrap();

  let mut source = InMemoryQuoteSource::new();
  source.insert(terms, QuoteSeries::new(observations.clone()).unwrap());
  let mut portfolio = HedgePortfolio::new(
    source,
    calendar,
    ID,
    HedgeConfig {
      risk_free_rate: 0.01,
      ..HedgeConfig::default()
    },
  )
  .unwrap();

  portfolio.initialize(Some(observations[0].date)).unwrap();
  let state = *portfolio.state().unwrap();

  let then = portfolio.summary(Some(observations[0].date)).unwrap();
  let now = portfolio.summary(None).unwrap();
  assert_abs_diff_eq!(then.portfolio_value, state.value(100.0), epsilon = 1e-12);
  assert_abs_diff_eq!(now.portfolio_value, state.value(104.0), epsilon = 1e-12);
  assert!(now.portfolio_value > then.portfolio_value);
}

#[test]
fn warrant_quote_past_maturity_is_invalid_input() {
  let calendar = WeekdayCalendar::new();
  let terms = ContractTerms::new(ID, 105.0, maturity(), OptionType::Call, 10.0).unwrap();
  let expired = Observation::new(NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(), 100.0, 0.1).unwrap();

  let mut source = InMemoryQuoteSource::new();
  source.insert(terms, QuoteSeries::new(vec![expired]).unwrap());
  let mut portfolio = HedgePortfolio::new(source, calendar, ID, HedgeConfig::default()).unwrap();

  assert!(matches!(
    portfolio.initialize(None),
    Err(HedgeError::InvalidInput(_))
  ));
  assert_eq!(portfolio.status(), PortfolioStatus::Uninitialized);
}
