use std::collections::BTreeSet;

use chrono::Datelike;
use chrono::NaiveDate;
use chrono::Weekday;

/// Trading-day counting for an exchange.
pub trait TradingCalendar {
  /// Trading days in `[start, end]`, both boundaries included. Zero when `start > end`.
  fn trading_day_count(&self, start: NaiveDate, end: NaiveDate, exchange: &str)
    -> anyhow::Result<u32>;

  /// Year fraction between `start` and `end` under a `days_per_year` convention.
  fn year_fraction(
    &self,
    start: NaiveDate,
    end: NaiveDate,
    exchange: &str,
    days_per_year: f64,
  ) -> anyhow::Result<f64> {
    anyhow::ensure!(
      days_per_year > 0.0,
      "trading days per year must be > 0, got {days_per_year}"
    );
    Ok(self.trading_day_count(start, end, exchange)? as f64 / days_per_year)
  }
}

/// Monday to Friday minus an explicit holiday list. The exchange code is not consulted.
#[derive(Clone, Debug, Default)]
pub struct WeekdayCalendar {
  holidays: BTreeSet<NaiveDate>,
}

impl WeekdayCalendar {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_holidays(holidays: impl IntoIterator<Item = NaiveDate>) -> Self {
    Self {
      holidays: holidays.into_iter().collect(),
    }
  }

  pub fn add_holiday(&mut self, date: NaiveDate) {
    self.holidays.insert(date);
  }

  pub fn is_trading_day(&self, date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !self.holidays.contains(&date)
  }

  /// Trading days from `start` onwards, `start` included when it trades.
  pub fn trading_days_from(&self, start: NaiveDate) -> impl Iterator<Item = NaiveDate> + '_ {
    start.iter_days().filter(|d| self.is_trading_day(*d))
  }
}

impl TradingCalendar for WeekdayCalendar {
  fn trading_day_count(
    &self,
    start: NaiveDate,
    end: NaiveDate,
    _exchange: &str,
  ) -> anyhow::Result<u32> {
    let count = start
      .iter_days()
      .take_while(|d| *d <= end)
      .filter(|d| self.is_trading_day(*d))
      .count();

    Ok(u32::try_from(count)?)
  }
}
