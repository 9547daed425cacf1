//! Loan input structures

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{LoanError, LoanResult};

/// Reference index tenor, which sets how often the rate resets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResetPeriod {
    /// 1M index, resets monthly
    OneMonth,
    /// 3M index, resets quarterly
    ThreeMonths,
    /// 6M index, resets semi-annually
    SixMonths,
}

impl ResetPeriod {
    pub fn months(&self) -> u32 {
        match self {
            ResetPeriod::OneMonth => 1,
            ResetPeriod::ThreeMonths => 3,
            ResetPeriod::SixMonths => 6,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResetPeriod::OneMonth => "1M",
            ResetPeriod::ThreeMonths => "3M",
            ResetPeriod::SixMonths => "6M",
        }
    }
}

impl FromStr for ResetPeriod {
    type Err = LoanError;

    /// Accepts `1M`, `3M`, `6M`, optionally prefixed with the index name
    /// (`WIBOR3M`, `wibor 6m`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_uppercase();
        let tenor = normalized.strip_prefix("WIBOR").unwrap_or(&normalized);

        match tenor {
            "1M" => Ok(ResetPeriod::OneMonth),
            "3M" => Ok(ResetPeriod::ThreeMonths),
            "6M" => Ok(ResetPeriod::SixMonths),
            _ => Err(LoanError::UnknownResetPeriod(s.to_string())),
        }
    }
}

impl fmt::Display for ResetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of a variable-rate loan simulation
///
/// Deserialized values go through [`LoanSimulationInput::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLoanSimulationInput")]
pub struct LoanSimulationInput {
    /// Amount borrowed
    pub principal: f64,

    /// Contractual term in months
    pub term_months: u32,

    /// Bank margin over the reference index, in percentage points
    pub margin_pct: f64,

    /// Months between rate resets (3 for a 3M index)
    pub reset_period_months: u32,

    /// Disbursement date; resets are dated from here
    pub start_date: NaiveDate,

    /// Stop after this many months to get totals to date
    pub limit_months: Option<u32>,
}

impl LoanSimulationInput {
    /// Build a validated input
    pub fn new(
        principal: f64,
        term_months: u32,
        margin_pct: f64,
        reset_period_months: u32,
        start_date: NaiveDate,
        limit_months: Option<u32>,
    ) -> LoanResult<Self> {
        let input = Self {
            principal,
            term_months,
            margin_pct,
            reset_period_months,
            start_date,
            limit_months,
        };
        input.validate()?;
        Ok(input)
    }

    /// Build a validated input from a reference index tenor
    pub fn with_reset_period(
        principal: f64,
        term_months: u32,
        margin_pct: f64,
        reset_period: ResetPeriod,
        start_date: NaiveDate,
        limit_months: Option<u32>,
    ) -> LoanResult<Self> {
        Self::new(principal, term_months, margin_pct, reset_period.months(), start_date, limit_months)
    }

    /// Check the preconditions the simulators assume
    pub fn validate(&self) -> LoanResult<()> {
        if !self.principal.is_finite() || self.principal <= 0.0 {
            return Err(LoanError::invalid("principal", format!("must be positive and finite, got {}", self.principal)));
        }
        if self.term_months == 0 {
            return Err(LoanError::invalid("term_months", "must be at least 1"));
        }
        if !self.margin_pct.is_finite() {
            return Err(LoanError::invalid("margin_pct", "must be finite"));
        }
        if self.reset_period_months == 0 {
            return Err(LoanError::invalid("reset_period_months", "must be at least 1"));
        }
        if let Some(limit) = self.limit_months {
            if limit == 0 || limit > self.term_months {
                return Err(LoanError::invalid(
                    "limit_months",
                    format!("must be within 1..={}, got {}", self.term_months, limit),
                ));
            }
        }
        Ok(())
    }

    /// Same loan, truncated at `limit_months`
    pub fn with_limit(mut self, limit_months: Option<u32>) -> LoanResult<Self> {
        self.limit_months = limit_months;
        self.validate()?;
        Ok(self)
    }

    /// Number of months the simulation walks
    pub fn months_to_simulate(&self) -> u32 {
        effective_limit(self.term_months, self.limit_months)
    }
}

/// Unvalidated wire form of `LoanSimulationInput`
#[derive(Debug, Deserialize)]
struct RawLoanSimulationInput {
    principal: f64,
    term_months: u32,
    margin_pct: f64,
    reset_period_months: u32,
    start_date: NaiveDate,
    #[serde(default)]
    limit_months: Option<u32>,
}

impl TryFrom<RawLoanSimulationInput> for LoanSimulationInput {
    type Error = LoanError;

    fn try_from(raw: RawLoanSimulationInput) -> Result<Self, Self::Error> {
        LoanSimulationInput::new(
            raw.principal,
            raw.term_months,
            raw.margin_pct,
            raw.reset_period_months,
            raw.start_date,
            raw.limit_months,
        )
    }
}

/// `min(term, limit)`, with a missing limit meaning the full term
pub fn effective_limit(term_months: u32, limit_months: Option<u32>) -> u32 {
    limit_months.unwrap_or(term_months).min(term_months)
}

/// A loan case: identifier plus simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanCase {
    pub case_id: String,
    pub input: LoanSimulationInput,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 1, 10).unwrap()
    }

    #[test]
    fn test_reset_period_parsing() {
        assert_eq!("3M".parse::<ResetPeriod>().unwrap(), ResetPeriod::ThreeMonths);
        assert_eq!("6m".parse::<ResetPeriod>().unwrap(), ResetPeriod::SixMonths);
        assert_eq!("WIBOR1M".parse::<ResetPeriod>().unwrap(), ResetPeriod::OneMonth);
        assert_eq!("wibor 6M".parse::<ResetPeriod>().unwrap(), ResetPeriod::SixMonths);
        assert!(matches!("12M".parse::<ResetPeriod>(), Err(LoanError::UnknownResetPeriod(_))));
        assert_eq!(ResetPeriod::ThreeMonths.months(), 3);
    }

    #[test]
    fn test_valid_input() {
        let input = LoanSimulationInput::with_reset_period(200_000.0, 120, 2.2, ResetPeriod::ThreeMonths, start(), None).unwrap();
        assert_eq!(input.reset_period_months, 3);
        assert_eq!(input.months_to_simulate(), 120);
    }

    #[test]
    fn test_rejects_bad_principal() {
        assert!(LoanSimulationInput::new(0.0, 120, 2.2, 3, start(), None).is_err());
        assert!(LoanSimulationInput::new(-5.0, 120, 2.2, 3, start(), None).is_err());
        assert!(LoanSimulationInput::new(f64::NAN, 120, 2.2, 3, start(), None).is_err());
        assert!(LoanSimulationInput::new(f64::INFINITY, 120, 2.2, 3, start(), None).is_err());
    }

    #[test]
    fn test_rejects_bad_term_and_period() {
        assert!(LoanSimulationInput::new(1_000.0, 0, 2.2, 3, start(), None).is_err());
        assert!(LoanSimulationInput::new(1_000.0, 12, 2.2, 0, start(), None).is_err());
        assert!(LoanSimulationInput::new(1_000.0, 12, f64::NAN, 3, start(), None).is_err());
    }

    #[test]
    fn test_limit_bounds() {
        assert!(LoanSimulationInput::new(1_000.0, 12, 2.2, 3, start(), Some(0)).is_err());
        assert!(LoanSimulationInput::new(1_000.0, 12, 2.2, 3, start(), Some(13)).is_err());

        let input = LoanSimulationInput::new(1_000.0, 12, 2.2, 3, start(), Some(12)).unwrap();
        assert_eq!(input.months_to_simulate(), 12);

        let truncated = input.with_limit(Some(5)).unwrap();
        assert_eq!(truncated.months_to_simulate(), 5);
    }

    #[test]
    fn test_deserialize_validates() {
        let valid = r#"{"principal":1000.0,"term_months":48,"margin_pct":2.0,
            "reset_period_months":3,"start_date":"2021-01-10","limit_months":40}"#;
        let input: LoanSimulationInput = serde_json::from_str(valid).unwrap();
        assert_eq!(input.months_to_simulate(), 40);

        let zero_period = r#"{"principal":1000.0,"term_months":48,"margin_pct":2.0,
            "reset_period_months":0,"start_date":"2021-01-10","limit_months":40}"#;
        let err = serde_json::from_str::<LoanSimulationInput>(zero_period).unwrap_err();
        assert!(err.to_string().contains("reset_period_months"));

        let bad_limit = r#"{"principal":1000.0,"term_months":48,"margin_pct":2.0,
            "reset_period_months":3,"start_date":"2021-01-10","limit_months":49}"#;
        assert!(serde_json::from_str::<LoanSimulationInput>(bad_limit).is_err());
    }

    #[test]
    fn test_serialize_round_trip_keeps_limit() {
        let input = LoanSimulationInput::new(1_000.0, 12, 2.2, 3, start(), Some(6)).unwrap();
        let json = serde_json::to_string(&input).unwrap();
        let parsed: LoanSimulationInput = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, input);
    }

    #[test]
    fn test_effective_limit() {
        assert_eq!(effective_limit(120, None), 120);
        assert_eq!(effective_limit(120, Some(30)), 30);
        assert_eq!(effective_limit(120, Some(500)), 120);
    }
}
