//! Loan inputs and case loading

mod data;
pub mod loader;

pub use data::{effective_limit, LoanCase, LoanSimulationInput, ResetPeriod};
pub use loader::{load_cases, load_cases_from_reader};
