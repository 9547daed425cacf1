//! Loan Amortization - Variable-rate annuity loan simulation engine
//!
//! This library provides:
//! - Annuity installment calculation
//! - Month-by-month simulation of a loan whose rate resets against a
//!   reference index (WIBOR-style 1M/3M/6M tenors)
//! - Margin-only and capital-only counterfactual schedules
//! - Savings comparison between the real and counterfactual schedules
//! - Reference rate histories and loan cases loaded from CSV/JSON
//! - Parallel batch evaluation of loan cases

pub mod error;
pub mod loan;
pub mod rates;
pub mod simulation;
pub mod scenario;

// Re-export commonly used types
pub use error::{LoanError, LoanResult};
pub use loan::{LoanCase, LoanSimulationInput, ResetPeriod};
pub use rates::{FlatRate, RateHistory, RateLookup, YearMonth};
pub use simulation::{
    annuity_payment, simulate_capital_only_schedule, simulate_margin_only_schedule,
    simulate_variable_rate_schedule, AmortizationEngine, AmortizationResult, CapitalOnlyResult,
    SavingsReport, ScheduleResult, ScheduleRow, SimulationConfig,
};
pub use scenario::{CaseReport, ScenarioRunner, SimulationScenario};
