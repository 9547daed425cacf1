//! Output structures for amortization simulations

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Totals of a simulated repayment window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmortizationResult {
    /// Sum of all installments paid
    pub total_paid: f64,

    /// Sum of the interest components of those installments
    pub total_interest: f64,

    /// Outstanding principal after the window, never negative
    pub remaining_balance: f64,
}

/// Result of the straight-line, interest-free counterfactual
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapitalOnlyResult {
    pub total_paid: f64,
    pub payment: f64,
}

/// A single month of a simulated schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// Simulation month (1-indexed)
    pub month: u32,

    /// Whether the rate and installment were re-derived this month
    pub reset: bool,

    /// Date used for the reference rate lookup (variable schedules, reset months only)
    pub reset_date: Option<NaiveDate>,

    /// Reference index in percentage points in force this month
    pub reference_rate: f64,

    /// Effective annual rate as a decimal (margin + reference) / 100
    pub annual_rate: f64,

    pub payment: f64,
    pub interest: f64,
    pub principal: f64,

    /// Part of the principal component beyond the outstanding balance,
    /// absorbed when the balance is floored at zero
    pub overpayment: f64,

    /// Balance after this month's payment
    pub balance: f64,
}

/// Complete simulation output: totals plus optional month-by-month detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResult {
    pub totals: AmortizationResult,

    /// Monthly rows, only populated when detailed output is enabled
    pub rows: Vec<ScheduleRow>,
}

impl ScheduleResult {
    /// Number of months simulated, when rows were recorded
    pub fn months(&self) -> usize {
        self.rows.len()
    }

    /// Installment of the first month, if rows were recorded
    pub fn initial_payment(&self) -> Option<f64> {
        self.rows.first().map(|r| r.payment)
    }

    /// Sum of the final-month overpayments absorbed by the zero floor
    pub fn total_overpayment(&self) -> f64 {
        self.rows.iter().map(|r| r.overpayment).sum()
    }

    /// Distinct installments in order of appearance, one per reset
    pub fn reset_payments(&self) -> Vec<(u32, f64)> {
        self.rows
            .iter()
            .filter(|r| r.reset)
            .map(|r| (r.month, r.payment))
            .collect()
    }
}
