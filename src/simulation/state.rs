//! Amortization state carried from month to month

use super::annuity::annuity_payment;
use super::schedule::AmortizationResult;

/// Amounts produced by one month of accrual
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthFlow {
    pub payment: f64,
    pub interest: f64,
    pub principal: f64,
    pub overpayment: f64,
}

/// State of a loan at a point in the simulation
#[derive(Debug, Clone)]
pub struct AmortizationState {
    /// Last completed month (0 before the first payment)
    pub month: u32,

    /// Outstanding principal
    pub balance: f64,

    /// Installment in force until the next reset
    pub payment: f64,

    /// Monthly rate in force until the next reset
    pub monthly_rate: f64,

    /// Effective annual rate in force (decimal)
    pub annual_rate: f64,

    pub total_paid: f64,
    pub total_interest: f64,
}

impl AmortizationState {
    /// Initialize state for a fresh loan of `principal`
    pub fn new(principal: f64) -> Self {
        Self {
            month: 0,
            balance: principal,
            payment: 0.0,
            monthly_rate: 0.0,
            annual_rate: 0.0,
            total_paid: 0.0,
            total_interest: 0.0,
        }
    }

    /// Re-amortize the outstanding balance over `remaining_months` at `annual_rate`
    pub fn reprice(&mut self, annual_rate: f64, remaining_months: u32) {
        self.annual_rate = annual_rate;
        self.monthly_rate = annual_rate / 12.0;
        self.payment = annuity_payment(self.balance, remaining_months, annual_rate);
    }

    /// Accrue interest, apply the installment and accumulate totals
    pub fn advance_month(&mut self) -> MonthFlow {
        self.month += 1;

        let interest = self.balance * self.monthly_rate;
        let principal = self.payment - interest;
        let overpayment = (principal - self.balance).max(0.0);

        self.balance = (self.balance - principal).max(0.0);
        self.total_paid += self.payment;
        self.total_interest += interest;

        MonthFlow {
            payment: self.payment,
            interest,
            principal,
            overpayment,
        }
    }

    pub fn result(&self) -> AmortizationResult {
        AmortizationResult {
            total_paid: self.total_paid,
            total_interest: self.total_interest,
            remaining_balance: self.balance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_single_month_accrual() {
        let mut state = AmortizationState::new(12_000.0);
        state.reprice(0.12, 12);

        let flow = state.advance_month();

        assert_eq!(state.month, 1);
        assert_relative_eq!(flow.interest, 120.0, epsilon = 1e-9);
        assert_relative_eq!(flow.principal, flow.payment - 120.0, epsilon = 1e-9);
        assert_relative_eq!(state.balance, 12_000.0 - flow.principal, epsilon = 1e-9);
        assert_eq!(flow.overpayment, 0.0);
    }

    #[test]
    fn test_balance_floored_at_zero() {
        let mut state = AmortizationState::new(100.0);
        state.payment = 150.0;
        state.monthly_rate = 0.0;

        let flow = state.advance_month();

        assert_eq!(state.balance, 0.0);
        assert_relative_eq!(flow.overpayment, 50.0);
        // Full installment is still recorded as paid
        assert_relative_eq!(state.total_paid, 150.0);
    }

    #[test]
    fn test_reprice_uses_current_balance() {
        let mut state = AmortizationState::new(10_000.0);
        state.reprice(0.0, 10);
        state.advance_month();
        state.reprice(0.0, 9);

        assert_relative_eq!(state.payment, 1_000.0, epsilon = 1e-9);
    }
}
