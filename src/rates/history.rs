//! Month-keyed reference rate history

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::RateLookup;
use crate::error::LoanError;

/// Calendar month key, ordered chronologically
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, LoanError> {
        if !(1..=12).contains(&month) {
            return Err(LoanError::InvalidMonthKey(format!("{:04}-{:02}", year, month)));
        }
        Ok(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl FromStr for YearMonth {
    type Err = LoanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LoanError::InvalidMonthKey(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.is_empty() || month.len() > 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        YearMonth::new(year, month).map_err(|_| invalid())
    }
}

impl TryFrom<String> for YearMonth {
    type Error = LoanError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Published reference rates by month, in percentage points.
///
/// A query resolves to the most recent entry at or before the queried month.
/// Queries earlier than all data fall back to the earliest entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateHistory {
    rates: BTreeMap<YearMonth, f64>,
}

impl RateHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (YearMonth, f64)>,
    {
        Self {
            rates: entries.into_iter().collect(),
        }
    }

    /// Insert or replace the rate published for `month`
    pub fn insert(&mut self, month: YearMonth, rate: f64) -> Option<f64> {
        self.rates.insert(month, rate)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Earliest known entry
    pub fn first(&self) -> Option<(YearMonth, f64)> {
        self.rates.iter().next().map(|(k, v)| (*k, *v))
    }

    /// Latest known entry
    pub fn last(&self) -> Option<(YearMonth, f64)> {
        self.rates.iter().next_back().map(|(k, v)| (*k, *v))
    }

    /// Rate in force for `month`, `None` only when the history is empty
    pub fn rate_for_month(&self, month: YearMonth) -> Option<f64> {
        match self.rates.range(..=month).next_back() {
            Some((_, rate)) => Some(*rate),
            None => {
                let (earliest, rate) = self.first()?;
                log::debug!(
                    "No reference rate at or before {}, using earliest entry {}",
                    month,
                    earliest
                );
                Some(rate)
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (YearMonth, f64)> + '_ {
        self.rates.iter().map(|(k, v)| (*k, *v))
    }
}

impl RateLookup for RateHistory {
    /// An empty history reads as a zero index
    fn reference_rate(&self, date: NaiveDate) -> f64 {
        self.rate_for_month(YearMonth::from_date(date)).unwrap_or(0.0)
    }
}
