//! Scenario runner for loan cases
//!
//! Holds one reference rate source and evaluates loan cases under every
//! repayment scenario. Cases are independent, so batches run in parallel.
//!
//! # Example
//! ```ignore
//! let runner = ScenarioRunner::new(load_rate_history("wibor3m.csv")?);
//! let reports = runner.evaluate_batch(&load_cases("cases.csv")?);
//! ```

use std::fmt;

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::LoanResult;
use crate::loan::{LoanCase, LoanSimulationInput};
use crate::rates::RateLookup;
use crate::simulation::{
    limit_as_of, simulate_capital_only_schedule, AmortizationEngine, AmortizationResult,
    CapitalOnlyResult, SavingsReport, ScheduleRow, SimulationConfig,
};

/// Which repayment schedule to simulate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SimulationScenario {
    /// Margin plus the reference index, re-amortized at each reset
    Variable,
    /// Margin only, reference index pinned at zero
    MarginOnly,
    /// Principal only, no interest
    CapitalOnly,
}

impl SimulationScenario {
    pub const ALL: [SimulationScenario; 3] = [
        SimulationScenario::Variable,
        SimulationScenario::MarginOnly,
        SimulationScenario::CapitalOnly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SimulationScenario::Variable => "variable",
            SimulationScenario::MarginOnly => "margin_only",
            SimulationScenario::CapitalOnly => "capital_only",
        }
    }
}

impl fmt::Display for SimulationScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one loan case under all scenarios
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseReport {
    pub case_id: String,

    /// Months actually simulated (term, or the to-date limit)
    pub months_simulated: u32,

    pub variable: AmortizationResult,
    pub margin_only: AmortizationResult,
    pub capital_only: CapitalOnlyResult,
    pub savings: SavingsReport,

    /// Variable-rate schedule detail, only with detailed output
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schedule: Vec<ScheduleRow>,
}

/// Evaluates loan cases against a shared rate source
#[derive(Debug, Clone)]
pub struct ScenarioRunner<L> {
    rates: L,
    engine: AmortizationEngine,
}

impl<L: RateLookup> ScenarioRunner<L> {
    /// Create runner with summary-only output
    pub fn new(rates: L) -> Self {
        Self::with_config(rates, SimulationConfig::default())
    }

    pub fn with_config(rates: L, config: SimulationConfig) -> Self {
        Self {
            rates,
            engine: AmortizationEngine::new(config),
        }
    }

    /// Totals of one scenario. The capital-only schedule carries no
    /// interest and leaves the unpaid principal outstanding.
    pub fn run(&self, input: &LoanSimulationInput, scenario: SimulationScenario) -> AmortizationResult {
        match scenario {
            SimulationScenario::Variable => self.engine.simulate_variable(input, &self.rates).totals,
            SimulationScenario::MarginOnly => {
                self.engine
                    .simulate_margin_only(input.principal, input.term_months, input.margin_pct, input.limit_months)
                    .totals
            }
            SimulationScenario::CapitalOnly => {
                let capital = simulate_capital_only_schedule(input.principal, input.term_months, input.limit_months);
                AmortizationResult {
                    total_paid: capital.total_paid,
                    total_interest: 0.0,
                    remaining_balance: (input.principal - capital.total_paid).max(0.0),
                }
            }
        }
    }

    /// Run all scenarios for a case and compare them
    pub fn evaluate(&self, case: &LoanCase) -> CaseReport {
        let input = &case.input;

        let variable = self.engine.simulate_variable(input, &self.rates);
        let margin_only = self
            .engine
            .simulate_margin_only(input.principal, input.term_months, input.margin_pct, input.limit_months)
            .totals;
        let capital_only = simulate_capital_only_schedule(input.principal, input.term_months, input.limit_months);
        let savings = SavingsReport::compare(&variable.totals, &margin_only, &capital_only);

        log::debug!(
            "Case {}: paid {:.2}, conservative delta {:.2}, aggressive delta {:.2}",
            case.case_id,
            variable.totals.total_paid,
            savings.conservative_delta,
            savings.aggressive_delta
        );

        CaseReport {
            case_id: case.case_id.clone(),
            months_simulated: input.months_to_simulate(),
            variable: variable.totals,
            margin_only,
            capital_only,
            savings,
            schedule: variable.rows,
        }
    }

    /// Evaluate a case with totals to date as of `as_of`.
    /// Fails when `as_of` precedes the loan start.
    pub fn evaluate_as_of(&self, case: &LoanCase, as_of: NaiveDate) -> LoanResult<CaseReport> {
        let mut case = case.clone();
        case.input.limit_months = limit_as_of(case.input.start_date, as_of, case.input.term_months)?;
        Ok(self.evaluate(&case))
    }
}

impl<L: RateLookup + Sync> ScenarioRunner<L> {
    /// Evaluate many cases in parallel, preserving input order
    pub fn evaluate_batch(&self, cases: &[LoanCase]) -> Vec<CaseReport> {
        log::info!("Evaluating {} loan cases", cases.len());
        let reports: Vec<CaseReport> = cases.par_iter().map(|case| self.evaluate(case)).collect();
        log::info!("Evaluated {} loan cases", reports.len());
        reports
    }

    /// Parallel batch with totals to date as of `as_of`; the first case not
    /// yet disbursed at `as_of` fails the batch
    pub fn evaluate_batch_as_of(&self, cases: &[LoanCase], as_of: NaiveDate) -> LoanResult<Vec<CaseReport>> {
        log::info!("Evaluating {} loan cases as of {}", cases.len(), as_of);
        cases.par_iter().map(|case| self.evaluate_as_of(case, as_of)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::ResetPeriod;
    use crate::rates::{FlatRate, RateHistory, YearMonth};
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn history() -> RateHistory {
        RateHistory::from_entries([
            (YearMonth::new(2021, 1).unwrap(), 0.2),
            (YearMonth::new(2022, 1).unwrap(), 2.5),
            (YearMonth::new(2023, 1).unwrap(), 6.8),
            (YearMonth::new(2024, 1).unwrap(), 5.5),
        ])
    }

    fn reference_case() -> LoanCase {
        LoanCase {
            case_id: "K-001".to_string(),
            input: LoanSimulationInput::with_reset_period(
                200_000.0,
                120,
                2.2,
                ResetPeriod::ThreeMonths,
                date(2021, 1, 10),
                None,
            )
            .unwrap(),
        }
    }

    #[test]
    fn test_adverse_rate_scenario() {
        let runner = ScenarioRunner::new(history());
        let report = runner.evaluate(&reference_case());

        assert!(report.variable.total_paid > report.margin_only.total_paid);
        assert!(report.margin_only.total_paid > report.capital_only.total_paid);
        assert!(report.savings.conservative_delta > 0.0);
        assert!(report.savings.aggressive_delta > report.savings.conservative_delta);
        assert!(report.savings.excess_interest > 0.0);
        assert_eq!(report.months_simulated, 120);
        assert!(report.schedule.is_empty());
    }

    #[test]
    fn test_run_matches_evaluate() {
        let runner = ScenarioRunner::new(history());
        let case = reference_case();
        let report = runner.evaluate(&case);

        assert_eq!(runner.run(&case.input, SimulationScenario::Variable), report.variable);
        assert_eq!(runner.run(&case.input, SimulationScenario::MarginOnly), report.margin_only);

        let capital = runner.run(&case.input, SimulationScenario::CapitalOnly);
        assert_eq!(capital.total_paid, 200_000.0);
        assert_eq!(capital.total_interest, 0.0);
        assert_eq!(capital.remaining_balance, 0.0);
    }

    #[test]
    fn test_capital_only_truncated_leaves_balance() {
        let runner = ScenarioRunner::new(FlatRate(0.0));
        let input = reference_case().input.with_limit(Some(60)).unwrap();
        let capital = runner.run(&input, SimulationScenario::CapitalOnly);

        assert_relative_eq!(capital.total_paid, 100_000.0, epsilon = 1e-9);
        assert_relative_eq!(capital.remaining_balance, 100_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_evaluate_as_of_truncates() {
        let runner = ScenarioRunner::new(history());
        let case = reference_case();

        let to_date = runner.evaluate_as_of(&case, date(2023, 1, 10)).unwrap();
        let full = runner.evaluate(&case);

        assert_eq!(to_date.months_simulated, 24);
        assert!(to_date.variable.total_paid < full.variable.total_paid);
        assert!(to_date.variable.remaining_balance > 0.0);

        let matured = runner.evaluate_as_of(&case, date(2035, 1, 1)).unwrap();
        assert_eq!(matured.months_simulated, 120);
        assert_eq!(matured.variable, full.variable);
    }

    #[test]
    fn test_evaluate_as_of_before_disbursement_fails() {
        let runner = ScenarioRunner::new(history());
        let case = reference_case();

        assert!(runner.evaluate_as_of(&case, date(2020, 12, 31)).is_err());

        let mut later = reference_case();
        later.case_id = "K-002".to_string();
        later.input.start_date = date(2024, 6, 1);
        let batch = runner.evaluate_batch_as_of(&[case, later], date(2023, 1, 10));
        assert!(batch.is_err());
    }

    #[test]
    fn test_batch_preserves_order() {
        let runner = ScenarioRunner::new(history());
        let cases: Vec<LoanCase> = (0..20)
            .map(|i| {
                let mut case = reference_case();
                case.case_id = format!("K-{:03}", i);
                case.input.principal = 100_000.0 + i as f64 * 10_000.0;
                case
            })
            .collect();

        let reports = runner.evaluate_batch(&cases);

        assert_eq!(reports.len(), 20);
        for (case, report) in cases.iter().zip(&reports) {
            assert_eq!(case.case_id, report.case_id);
        }
        // Larger loans cost more under the same rates
        assert!(reports[19].variable.total_paid > reports[0].variable.total_paid);
    }

    #[test]
    fn test_detailed_runner_keeps_schedule() {
        let runner = ScenarioRunner::with_config(history(), SimulationConfig::detailed());
        let report = runner.evaluate(&reference_case());

        assert_eq!(report.schedule.len(), 120);
        assert!(report.schedule[0].reset);
        assert_relative_eq!(report.schedule[0].reference_rate, 0.2);
    }

    #[test]
    fn test_scenario_names() {
        let names: Vec<String> = SimulationScenario::ALL.iter().map(|s| s.to_string()).collect();
        assert_eq!(names, vec!["variable", "margin_only", "capital_only"]);
    }
}
