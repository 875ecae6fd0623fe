//! # Hedge Portfolio
//!
//! $$
//! n_S^{(t)} = \Delta_t,\qquad n_B^{(t)} = n_S^{(t-1)} S_t + n_B^{(t-1)} - \Delta_t S_t
//! $$
//!
//! Replicating portfolio for one listed warrant. Holdings start at
//! `(Δ, C - Δ·S)` and every later rebalance moves to the new delta while keeping
//! the pre-rebalance value.
use chrono::NaiveDate;
use tracing::info;

use super::types::HedgeConfig;
use super::types::HedgeState;
use super::types::PortfolioStatus;
use super::types::PortfolioSummary;
use super::types::RebalanceRecord;
use crate::quant::error::HedgeError;
use crate::quant::error::Result;
use crate::quant::instrument::Instrument;
use crate::quant::market::ContractTerms;
use crate::quant::market::Observation;
use crate::quant::market::QuoteSeries;
use crate::quant::market::QuoteSource;
use crate::quant::market::TradingCalendar;
use crate::quant::traits::PricerExt;

pub struct HedgePortfolio<Q, C> {
  source: Q,
  calendar: C,
  config: HedgeConfig,
  terms: ContractTerms,
  series: QuoteSeries,
  state: Option<HedgeState>,
  history: Vec<RebalanceRecord>,
}

impl<Q: QuoteSource, C: TradingCalendar> HedgePortfolio<Q, C> {
  /// Load terms and quotes for `identifier`. The portfolio starts uninitialized.
  pub fn new(source: Q, calendar: C, identifier: &str, config: HedgeConfig) -> Result<Self> {
    let terms = source.fetch_terms(identifier)?;
    let series = source.fetch_series(identifier)?;
    info!(
      identifier,
      strike = terms.strike,
      maturity = %terms.maturity,
      option_type = %terms.option_type,
      entitlement = terms.entitlement,
      quotes = series.len(),
      "hedge portfolio created"
    );

    Ok(Self {
      source,
      calendar,
      config,
      terms,
      series,
      state: None,
      history: Vec::new(),
    })
  }

  pub fn status(&self) -> PortfolioStatus {
    match self.state {
      Some(_) => PortfolioStatus::Active,
      None => PortfolioStatus::Uninitialized,
    }
  }

  pub fn config(&self) -> &HedgeConfig {
    &self.config
  }

  pub fn terms(&self) -> &ContractTerms {
    &self.terms
  }

  pub fn series(&self) -> &QuoteSeries {
    &self.series
  }

  pub fn state(&self) -> Option<&HedgeState> {
    self.state.as_ref()
  }

  pub fn history(&self) -> &[RebalanceRecord] {
    &self.history
  }

  pub fn source(&self) -> &Q {
    &self.source
  }

  pub fn source_mut(&mut self) -> &mut Q {
    &mut self.source
  }

  /// Re-read the quote series from the source.
  pub fn refresh(&mut self) -> Result<()> {
    self.series = self.source.fetch_series(&self.terms.identifier)?;
    Ok(())
  }

  /// Append a quote to the local series, e.g. from a live feed.
  pub fn record_observation(&mut self, observation: Observation) -> Result<()> {
    self.series.push(observation)
  }

  /// Trading-day year fraction from `date` to maturity.
  pub fn tau_at(&self, date: NaiveDate) -> Result<f64> {
    let tau = self.calendar.year_fraction(
      date,
      self.terms.maturity,
      &self.terms.exchange,
      self.config.trading_days_per_year,
    )?;

    if tau <= 0.0 {
      return Err(HedgeError::InvalidInput(format!(
        "no trading days left between {date} and maturity {}",
        self.terms.maturity
      )));
    }

    Ok(tau)
  }

  /// Instrument priced off the quote for `date`, or the latest quote.
  pub fn instrument_at(&self, date: Option<NaiveDate>) -> Result<Instrument> {
    let observation = self.series.resolve(date)?;
    self.instrument_for(observation)
  }

  fn instrument_for(&self, observation: &Observation) -> Result<Instrument> {
    let tau = self.tau_at(observation.date)?;
    Instrument::from_terms(
      &self.terms,
      observation,
      tau,
      self.config.risk_free_rate,
      self.config.solver,
    )
  }

  /// Compute the next holdings without touching the portfolio.
  fn step(&self, observation: &Observation, previous: Option<HedgeState>) -> Result<RebalanceRecord> {
    let instrument = self.instrument_for(observation)?;
    let (model_price, delta) = instrument.value()?;
    let pricer = instrument.pricer()?;

    let (state, value_before) = match previous {
      None => (
        HedgeState::new(delta, observation.quote - delta * observation.spot),
        observation.quote,
      ),
      Some(previous) => (
        previous.rebalanced(delta, observation.spot),
        previous.value(observation.spot),
      ),
    };

    Ok(RebalanceRecord {
      date: observation.date,
      spot: observation.spot,
      quote: observation.quote,
      model_price,
      sigma: instrument.sigma()?,
      delta,
      gamma: pricer.gamma()?,
      theta: pricer.theta()?,
      rho: pricer.rho()?,
      tau: instrument.tau(),
      state,
      value_before,
      value_after: state.value(observation.spot),
    })
  }

  /// Open the hedge at `start_date`, or at the latest quote.
  pub fn initialize(&mut self, start_date: Option<NaiveDate>) -> Result<PortfolioSummary> {
    if self.state.is_some() {
      return Err(HedgeError::InvalidState(
        "portfolio is already initialized, reset it first",
      ));
    }

    let observation = *self.series.resolve(start_date)?;
    let record = self.step(&observation, None)?;
    info!(
      date = %record.date,
      sigma = record.sigma,
      delta = record.delta,
      units_cash = record.state.units_cash,
      "hedge initialized"
    );

    self.state = Some(record.state);
    self.history.push(record);
    self.summary(Some(observation.date))
  }

  /// Rebalance to the delta at the latest quote, financed by the current holdings.
  pub fn update(&mut self) -> Result<PortfolioSummary> {
    let previous = *self
      .state
      .as_ref()
      .ok_or(HedgeError::InvalidState("update called before initialize"))?;

    let observation = *self.series.latest()?;
    let record = self.step(&observation, Some(previous))?;
    info!(
      date = %record.date,
      sigma = record.sigma,
      delta = record.delta,
      value = record.value_before,
      "hedge rebalanced"
    );

    self.state = Some(record.state);
    self.history.push(record);
    self.summary(None)
  }

  /// Holdings and their value at the spot for `date`, or the latest spot.
  pub fn summary(&self, date: Option<NaiveDate>) -> Result<PortfolioSummary> {
    let state = self
      .state
      .as_ref()
      .ok_or(HedgeError::InvalidState("portfolio is not initialized"))?;
    let observation = self.series.resolve(date)?;

    Ok(PortfolioSummary {
      date: observation.date,
      units_underlying: state.units_underlying,
      units_cash: state.units_cash,
      portfolio_value: state.value(observation.spot),
    })
  }

  /// Drop holdings and history; the next call must be [`Self::initialize`].
  pub fn reset(&mut self) {
    self.state = None;
    self.history.clear();
  }
}
