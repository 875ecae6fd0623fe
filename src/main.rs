use std::env;

use anyhow::Context;
use anyhow::Result;
use chrono::NaiveDate;
use prettytable::row;
use prettytable::Table;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::Distribution;
use rand_distr::StandardNormal;
use tracing::info;
use tracing_subscriber::EnvFilter;
use warrant_hedge::quant::hedge::RebalanceRecord;
use warrant_hedge::quant::market::ContractTerms;
use warrant_hedge::quant::market::InMemoryQuoteSource;
use warrant_hedge::quant::market::Observation;
use warrant_hedge::quant::market::QuoteSeries;
use warrant_hedge::quant::market::TradingCalendar;
use warrant_hedge::quant::market::WeekdayCalendar;
use warrant_hedge::BSMPricer;
use warrant_hedge::HedgeConfig;
use warrant_hedge::HedgePortfolio;
use warrant_hedge::OptionType;
use warrant_hedge::PricerExt;

const IDENTIFIER: &str = "DEMO1";
const TRADING_DAYS: usize = 40;
const SPOT: f64 = 100.0;
const SIGMA: f64 = 0.25;
const SEED: u64 = 42;

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let risk_free_rate = match env::var("HEDGE_RISK_FREE") {
    Ok(raw) => raw
      .parse::<f64>()
      .with_context(|| format!("HEDGE_RISK_FREE={raw} is not a number"))?,
    Err(_) => 0.02,
  };
  let config = HedgeConfig {
    risk_free_rate,
    ..HedgeConfig::default()
  };

  let start = NaiveDate::from_ymd_opt(2024, 3, 1).context("invalid start date")?;
  let maturity = NaiveDate::from_ymd_opt(2024, 12, 31).context("invalid maturity")?;
  let terms = ContractTerms::new(IDENTIFIER, 105.0, maturity, OptionType::Call, 10.0)?;
  let calendar = WeekdayCalendar::new();
  let observations = simulate_quotes(&terms, &calendar, start, &config)?;
  info!(quotes = observations.len(), "simulated warrant quotes");

  let mut source = InMemoryQuoteSource::new();
  source.insert(terms, QuoteSeries::new(vec![observations[0]])?);

  let mut portfolio = HedgePortfolio::new(source, calendar, IDENTIFIER, config)?;
  portfolio.initialize(None)?;
  for observation in &observations[1..] {
    portfolio.record_observation(*observation)?;
    portfolio.update()?;
  }

  print_history(portfolio.history());
  println!("{}", portfolio.summary(None)?);

  Ok(())
}

/// GBM path for the underlying with quotes from the unscaled model, rounded to the tick.
fn simulate_quotes(
  terms: &ContractTerms,
  calendar: &WeekdayCalendar,
  start: NaiveDate,
  config: &HedgeConfig,
) -> Result<Vec<Observation>> {
  let mut rng = StdRng::seed_from_u64(SEED);
  let dt = 1.0 / config.trading_days_per_year;
  let drift = (config.risk_free_rate - 0.5 * SIGMA * SIGMA) * dt;
  let mut spot = SPOT;
  let mut observations = Vec::with_capacity(TRADING_DAYS);

  for date in calendar.trading_days_from(start).take(TRADING_DAYS) {
    let tau = calendar.year_fraction(
      date,
      terms.maturity,
      &terms.exchange,
      config.trading_days_per_year,
    )?;
    let raw = BSMPricer::new(
      spot,
      SIGMA,
      terms.strike,
      config.risk_free_rate,
      tau,
      terms.option_type,
    )
    .price()?;
    let quote = (raw * 1000.0).round() / 1000.0;
    observations.push(Observation::new(date, spot, quote)?);

    let z: f64 = StandardNormal.sample(&mut rng);
    spot *= (drift + SIGMA * dt.sqrt() * z).exp();
  }

  Ok(observations)
}

fn print_history(history: &[RebalanceRecord]) {
  let mut table = Table::new();
  table.add_row(row![
    "Date",
    "Spot",
    "Quote",
    "Model",
    "Sigma",
    "Delta",
    "Stock Units",
    "Riskless Units",
    "Value"
  ]);

  for record in history {
    table.add_row(row![
      record.date,
      format!("{:.3}", record.spot),
      format!("{:.3}", record.quote),
      format!("{:.4}", record.model_price),
      format!("{:.4}", record.sigma),
      format!("{:.4}", record.delta),
      format!("{:.4}", record.state.units_underlying),
      format!("{:.4}", record.state.units_cash),
      format!("{:.4}", record.value_after)
    ]);
  }

  table.printstd();
}
