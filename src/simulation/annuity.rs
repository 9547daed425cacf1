//! Annuity payment calculation

/// Constant monthly installment that fully amortizes `principal` over
/// `months` periods at `annual_rate` (decimal, e.g. 0.065), compounded monthly.
///
/// A zero rate falls back to straight-line repayment. Callers must pass
/// `months > 0`. A monthly rate at or below -100% has no meaningful annuity
/// and yields `NaN`.
pub fn annuity_payment(principal: f64, months: u32, annual_rate: f64) -> f64 {
    let monthly_rate = annual_rate / 12.0;

    if monthly_rate == 0.0 {
        return principal / months as f64;
    }

    if monthly_rate <= -1.0 {
        return f64::NAN;
    }

    let discount = (1.0 + monthly_rate).powi(-(months as i32));
    principal * monthly_rate / (1.0 - discount)
}
