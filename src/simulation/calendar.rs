//! Whole-month calendar arithmetic
//!
//! Month increments clamp to the last day of the target month:
//! 2021-01-31 plus one month is 2021-02-28.

use chrono::{Datelike, Months, NaiveDate};

use crate::error::{LoanError, LoanResult};

/// Date of the reset that happens `offset` months after `start`.
///
/// Saturates at `NaiveDate::MAX` instead of failing; only reachable for
/// dates hundreds of millennia out.
pub fn add_months(start: NaiveDate, offset: u32) -> NaiveDate {
    start
        .checked_add_months(Months::new(offset))
        .unwrap_or(NaiveDate::MAX)
}

/// Number of whole months between `start` and `as_of`, using the same
/// clamping rule as [`add_months`]: the largest `k` with
/// `add_months(start, k) <= as_of`. Zero when `as_of` is not after `start`.
pub fn months_elapsed(start: NaiveDate, as_of: NaiveDate) -> u32 {
    if as_of <= start {
        return 0;
    }

    let span = (as_of.year() - start.year()) * 12 + as_of.month() as i32 - start.month() as i32;
    let mut months = span.max(0) as u32;
    if add_months(start, months) > as_of {
        months -= 1;
    }
    months
}

/// Simulation limit for "totals to date" as of `as_of`.
///
/// Returns `None` once the loan has reached its full term, so the simulation
/// runs to maturity. While the loan is live the limit is at least one month.
/// A date before disbursement is rejected: no installment exists yet.
pub fn limit_as_of(start: NaiveDate, as_of: NaiveDate, term_months: u32) -> LoanResult<Option<u32>> {
    if as_of < start {
        return Err(LoanError::invalid(
            "as_of",
            format!("{} is before the loan start date {}", as_of, start),
        ));
    }

    let elapsed = months_elapsed(start, as_of);
    if elapsed >= term_months {
        Ok(None)
    } else {
        Ok(Some(elapsed.max(1)))
    }
}
