//! Load reference rate histories from CSV or JSON
//!
//! CSV files carry a `month,rate` header with `YYYY-MM` keys and rates in
//! percentage points. JSON files are a single object keyed by month:
//! `{"2021-01": 0.21, "2022-03": 3.62}`.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::Reader;

use super::history::{RateHistory, YearMonth};
use crate::error::{LoanError, LoanResult};

/// Raw CSV row
#[derive(Debug, serde::Deserialize)]
struct RateRow {
    month: String,
    rate: f64,
}

/// Load a rate history, choosing the format from the file extension
/// (`.json` is JSON, anything else is CSV)
pub fn load_rate_history<P: AsRef<Path>>(path: P) -> LoanResult<RateHistory> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let file = File::open(path)?;
    let history = if is_json {
        load_rate_history_json(BufReader::new(file))?
    } else {
        load_rate_history_csv(file)?
    };

    log::info!(
        "Loaded {} reference rates from {} ({} to {})",
        history.len(),
        path.display(),
        history.first().map(|(m, _)| m.to_string()).unwrap_or_default(),
        history.last().map(|(m, _)| m.to_string()).unwrap_or_default(),
    );

    Ok(history)
}

/// Load a rate history from CSV data
pub fn load_rate_history_csv<R: Read>(reader: R) -> LoanResult<RateHistory> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut history = RateHistory::new();

    for result in csv_reader.deserialize() {
        let row: RateRow = result?;
        let month: YearMonth = row.month.parse()?;
        if !row.rate.is_finite() {
            return Err(LoanError::invalid("rate", format!("non-finite rate for {}", month)));
        }
        if let Some(previous) = history.insert(month, row.rate) {
            log::warn!("Duplicate reference rate for {}, replacing {} with {}", month, previous, row.rate);
        }
    }

    non_empty(history)
}

/// Load a rate history from a JSON object keyed by `YYYY-MM`
pub fn load_rate_history_json<R: Read>(reader: R) -> LoanResult<RateHistory> {
    let history: RateHistory = serde_json::from_reader(reader)?;
    if let Some((month, _)) = history.iter().find(|(_, rate)| !rate.is_finite()) {
        return Err(LoanError::invalid("rate", format!("non-finite rate for {}", month)));
    }
    non_empty(history)
}

fn non_empty(history: RateHistory) -> LoanResult<RateHistory> {
    if history.is_empty() {
        Err(LoanError::EmptyRateHistory)
    } else {
        Ok(history)
    }
}
