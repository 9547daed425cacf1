//! Reference rate sources
//!
//! The simulators only see the [`RateLookup`] capability. [`RateHistory`]
//! is the table-backed implementation loaded from CSV or JSON.

mod history;
pub mod loader;

pub use history::{RateHistory, YearMonth};
pub use loader::{load_rate_history, load_rate_history_csv, load_rate_history_json};

use chrono::NaiveDate;

/// Reference index in percentage points (6.5 means 6.5%) at a given date.
///
/// Must be deterministic for a given date. Any closure `Fn(NaiveDate) -> f64`
/// is a lookup.
pub trait RateLookup {
    fn reference_rate(&self, date: NaiveDate) -> f64;
}

impl<F> RateLookup for F
where
    F: Fn(NaiveDate) -> f64,
{
    fn reference_rate(&self, date: NaiveDate) -> f64 {
        self(date)
    }
}

/// Lookup returning the same rate for every date
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatRate(pub f64);

impl RateLookup for FlatRate {
    fn reference_rate(&self, _date: NaiveDate) -> f64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_closure_is_lookup() {
        let lookup = |d: NaiveDate| d.month() as f64;
        let date = NaiveDate::from_ymd_opt(2022, 7, 1).unwrap();
        assert_eq!(lookup.reference_rate(date), 7.0);
    }

    #[test]
    fn test_flat_rate() {
        let date = NaiveDate::from_ymd_opt(1999, 1, 1).unwrap();
        assert_eq!(FlatRate(-0.5).reference_rate(date), -0.5);
    }
}
