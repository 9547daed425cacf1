//! Month-by-month amortization engine
//!
//! Three repayment schedules over the same principal and term:
//! - variable rate: margin plus a reference index sampled at each reset, with
//!   the outstanding balance re-amortized over the remaining term
//! - margin only: the same loan with the index pinned at zero
//! - capital only: straight-line principal with no interest at all

use crate::loan::{effective_limit, LoanSimulationInput};
use crate::rates::RateLookup;
use super::annuity::annuity_payment;
use super::calendar::add_months;
use super::schedule::{AmortizationResult, CapitalOnlyResult, ScheduleResult, ScheduleRow};
use super::state::{AmortizationState, MonthFlow};

/// Configuration for a simulation run
#[derive(Debug, Clone, Default)]
pub struct SimulationConfig {
    /// Record a `ScheduleRow` for every simulated month
    pub detailed_output: bool,
}

impl SimulationConfig {
    pub fn detailed() -> Self {
        Self { detailed_output: true }
    }
}

/// Amortization engine
#[derive(Debug, Clone, Default)]
pub struct AmortizationEngine {
    config: SimulationConfig,
}

impl AmortizationEngine {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    /// Simulate the real loan: the rate resets every `reset_period_months`
    /// against `rates`, and each reset re-derives the installment from the
    /// current balance over the remaining term.
    pub fn simulate_variable<L>(&self, input: &LoanSimulationInput, rates: &L) -> ScheduleResult
    where
        L: RateLookup + ?Sized,
    {
        let limit = input.months_to_simulate();
        let mut state = AmortizationState::new(input.principal);
        let mut reference_rate = 0.0;
        let mut rows = Vec::new();

        for month in 1..=limit {
            let offset = month - 1;
            // a zero period only resets at month 1
            let is_reset = offset == 0
                || (input.reset_period_months != 0 && offset % input.reset_period_months == 0);
            let reset_date = if is_reset {
                let date = add_months(input.start_date, offset);
                reference_rate = rates.reference_rate(date);
                let annual_rate = (input.margin_pct + reference_rate) / 100.0;
                state.reprice(annual_rate, input.term_months - offset);

                log::debug!(
                    "Reset at month {} ({}): reference {:.4}%, annual {:.6}, payment {:.2}",
                    month,
                    date,
                    reference_rate,
                    annual_rate,
                    state.payment
                );
                Some(date)
            } else {
                None
            };

            let flow = state.advance_month();

            if self.config.detailed_output {
                rows.push(self.record_row(&state, &flow, reference_rate, reset_date.is_some(), reset_date));
            }
        }

        ScheduleResult {
            totals: state.result(),
            rows,
        }
    }

    /// Simulate the counterfactual with the reference index at zero: one
    /// rate (`margin_pct / 100`) and one installment over the full term.
    pub fn simulate_margin_only(
        &self,
        principal: f64,
        term_months: u32,
        margin_pct: f64,
        limit_months: Option<u32>,
    ) -> ScheduleResult {
        let limit = effective_limit(term_months, limit_months);
        let mut state = AmortizationState::new(principal);
        state.reprice(margin_pct / 100.0, term_months);
        let mut rows = Vec::new();

        for month in 1..=limit {
            let flow = state.advance_month();

            if self.config.detailed_output {
                rows.push(self.record_row(&state, &flow, 0.0, month == 1, None));
            }
        }

        ScheduleResult {
            totals: state.result(),
            rows,
        }
    }

    fn record_row(
        &self,
        state: &AmortizationState,
        flow: &MonthFlow,
        reference_rate: f64,
        reset: bool,
        reset_date: Option<chrono::NaiveDate>,
    ) -> ScheduleRow {
        ScheduleRow {
            month: state.month,
            reset,
            reset_date,
            reference_rate,
            annual_rate: state.annual_rate,
            payment: flow.payment,
            interest: flow.interest,
            principal: flow.principal,
            overpayment: flow.overpayment,
            balance: state.balance,
        }
    }
}

/// Totals of the variable-rate schedule
pub fn simulate_variable_rate_schedule<L>(input: &LoanSimulationInput, rates: &L) -> AmortizationResult
where
    L: RateLookup + ?Sized,
{
    AmortizationEngine::default().simulate_variable(input, rates).totals
}

/// Totals of the margin-only (zero index) schedule
pub fn simulate_margin_only_schedule(
    principal: f64,
    term_months: u32,
    margin_pct: f64,
    limit_months: Option<u32>,
) -> AmortizationResult {
    AmortizationEngine::default()
        .simulate_margin_only(principal, term_months, margin_pct, limit_months)
        .totals
}

/// Straight-line principal-only repayment: `principal / term_months` per
/// month over the (possibly truncated) window
pub fn simulate_capital_only_schedule(
    principal: f64,
    term_months: u32,
    limit_months: Option<u32>,
) -> CapitalOnlyResult {
    let limit = effective_limit(term_months, limit_months);
    let payment = annuity_payment(principal, term_months, 0.0);

    CapitalOnlyResult {
        // principal * (limit / term) equals payment * limit, and is exact at full term
        total_paid: principal * (limit as f64 / term_months as f64),
        payment,
    }
}
