//! Savings comparison against counterfactual schedules

use serde::{Deserialize, Serialize};

use super::schedule::{AmortizationResult, CapitalOnlyResult};

/// Amount the real schedule paid beyond a counterfactual total
pub fn savings_delta(real_total_paid: f64, counterfactual_total_paid: f64) -> f64 {
    real_total_paid - counterfactual_total_paid
}

/// Value delivered under both counterfactual framings.
///
/// Positive deltas mean the real loan cost more than the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavingsReport {
    pub real_total_paid: f64,
    pub margin_only_total_paid: f64,
    pub capital_only_total_paid: f64,

    /// Real minus margin-only: cost attributable to the reference index
    pub conservative_delta: f64,

    /// Real minus capital-only: the whole financing cost
    pub aggressive_delta: f64,

    /// Real interest minus margin-only interest
    pub excess_interest: f64,
}

impl SavingsReport {
    pub fn compare(
        real: &AmortizationResult,
        margin_only: &AmortizationResult,
        capital_only: &CapitalOnlyResult,
    ) -> Self {
        Self {
            real_total_paid: real.total_paid,
            margin_only_total_paid: margin_only.total_paid,
            capital_only_total_paid: capital_only.total_paid,
            conservative_delta: savings_delta(real.total_paid, margin_only.total_paid),
            aggressive_delta: savings_delta(real.total_paid, capital_only.total_paid),
            excess_interest: real.total_interest - margin_only.total_interest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare() {
        let real = AmortizationResult { total_paid: 260_000.0, total_interest: 60_000.0, remaining_balance: 0.0 };
        let margin = AmortizationResult { total_paid: 223_000.0, total_interest: 23_000.0, remaining_balance: 0.0 };
        let capital = CapitalOnlyResult { total_paid: 200_000.0, payment: 1_666.0 };

        let report = SavingsReport::compare(&real, &margin, &capital);

        assert_eq!(report.conservative_delta, 37_000.0);
        assert_eq!(report.aggressive_delta, 60_000.0);
        assert_eq!(report.excess_interest, 37_000.0);
        assert!(report.aggressive_delta >= report.conservative_delta);
    }

    #[test]
    fn test_delta_sign_follows_cost() {
        assert!(savings_delta(100.0, 120.0) < 0.0);
        assert!(savings_delta(120.0, 100.0) > 0.0);
    }
}
