use std::collections::HashMap;

use anyhow::anyhow;
use anyhow::Context;

use super::ContractTerms;
use super::Observation;
use super::QuoteSeries;

/// Reference data and quote history for listed derivatives.
pub trait QuoteSource {
  fn fetch_terms(&self, identifier: &str) -> anyhow::Result<ContractTerms>;

  /// Quote history, most recent first.
  fn fetch_series(&self, identifier: &str) -> anyhow::Result<QuoteSeries>;
}

impl<Q: QuoteSource + ?Sized> QuoteSource for &Q {
  fn fetch_terms(&self, identifier: &str) -> anyhow::Result<ContractTerms> {
    (**self).fetch_terms(identifier)
  }

  fn fetch_series(&self, identifier: &str) -> anyhow::Result<QuoteSeries> {
    (**self).fetch_series(identifier)
  }
}

/// Quote source backed by maps, keyed by listing code.
#[derive(Clone, Debug, Default)]
pub struct InMemoryQuoteSource {
  terms: HashMap<String, ContractTerms>,
  series: HashMap<String, QuoteSeries>,
}

impl InMemoryQuoteSource {
  pub fn new() -> Self {
    Self::default()
  }

  /// Register an instrument, replacing any previous entry with the same identifier.
  pub fn insert(&mut self, terms: ContractTerms, series: QuoteSeries) {
    self.series.insert(terms.identifier.clone(), series);
    self.terms.insert(terms.identifier.clone(), terms);
  }

  pub fn push_observation(&mut self, identifier: &str, observation: Observation) -> anyhow::Result<()> {
    let series = self
      .series
      .get_mut(identifier)
      .ok_or_else(|| anyhow!("unknown instrument {identifier}"))?;
    series
      .push(observation)
      .with_context(|| format!("appending quote to {identifier}"))
  }
}

impl QuoteSource for InMemoryQuoteSource {
  fn fetch_terms(&self, identifier: &str) -> anyhow::Result<ContractTerms> {
    self
      .terms
      .get(identifier)
      .cloned()
      .ok_or_else(|| anyhow!("no contract terms for {identifier}"))
  }

  fn fetch_series(&self, identifier: &str) -> anyhow::Result<QuoteSeries> {
    self
      .series
      .get(identifier)
      .cloned()
      .ok_or_else(|| anyhow!("no quote series for {identifier}"))
  }
}
