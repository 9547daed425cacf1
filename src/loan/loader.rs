//! Load loan cases from CSV
//!
//! Expected columns:
//! `case_id,principal,term_months,margin_pct,wibor_type,start_date,limit_months`
//! where `limit_months` may be left empty or omitted.

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::Reader;

use super::{LoanCase, LoanSimulationInput, ResetPeriod};
use crate::error::{LoanError, LoanResult};

/// Raw CSV row
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    case_id: String,
    principal: f64,
    term_months: u32,
    margin_pct: f64,
    wibor_type: String,
    start_date: NaiveDate,
    #[serde(default)]
    limit_months: Option<u32>,
}

impl CsvRow {
    fn to_case(self) -> LoanResult<LoanCase> {
        let reset_period: ResetPeriod = self.wibor_type.parse()?;
        let input = LoanSimulationInput::with_reset_period(
            self.principal,
            self.term_months,
            self.margin_pct,
            reset_period,
            self.start_date,
            self.limit_months,
        )
        .map_err(|e| match e {
            LoanError::InvalidInput { field, reason } => LoanError::InvalidInput {
                field,
                reason: format!("{} (case {})", reason, self.case_id),
            },
            other => other,
        })?;

        Ok(LoanCase {
            case_id: self.case_id,
            input,
        })
    }
}

/// Load all loan cases from a CSV file
pub fn load_cases<P: AsRef<Path>>(path: P) -> LoanResult<Vec<LoanCase>> {
    let reader = Reader::from_path(path.as_ref())?;
    let cases = collect_cases(reader)?;
    log::info!("Loaded {} loan cases from {}", cases.len(), path.as_ref().display());
    Ok(cases)
}

/// Load loan cases from any reader (string buffer, request body)
pub fn load_cases_from_reader<R: Read>(reader: R) -> LoanResult<Vec<LoanCase>> {
    collect_cases(Reader::from_reader(reader))
}

fn collect_cases<R: Read>(mut reader: Reader<R>) -> LoanResult<Vec<LoanCase>> {
    let mut cases = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        cases.push(row.to_case()?);
    }

    Ok(cases)
}
