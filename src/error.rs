//! Error types for input validation and data loading
//!
//! The simulators themselves never fail; these errors come from the
//! boundary: building a validated `LoanSimulationInput`, parsing tenors and
//! month keys, and loading CSV/JSON datasets.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoanError {
    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Unknown reset period: {0}")]
    UnknownResetPeriod(String),

    #[error("Invalid month key '{0}', expected YYYY-MM")]
    InvalidMonthKey(String),

    #[error("Reference rate history is empty")]
    EmptyRateHistory,

    #[error("Date arithmetic out of range")]
    DateOverflow,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LoanError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        LoanError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

pub type LoanResult<T> = Result<T, LoanError>;
