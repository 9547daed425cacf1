//! Amortization simulators and savings comparison

mod annuity;
pub mod calendar;
mod comparator;
mod engine;
mod schedule;
mod state;

pub use annuity::annuity_payment;
pub use calendar::{add_months, limit_as_of, months_elapsed};
pub use comparator::{savings_delta, SavingsReport};
pub use engine::{
    simulate_capital_only_schedule, simulate_margin_only_schedule, simulate_variable_rate_schedule,
    AmortizationEngine, SimulationConfig,
};
pub use schedule::{AmortizationResult, CapitalOnlyResult, ScheduleResult, ScheduleRow};
pub use state::{AmortizationState, MonthFlow};
