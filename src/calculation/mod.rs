//! Statutory payroll calculators and the orchestration pipeline.
//!
//! Each calculator is a pure function over explicit inputs that returns its
//! computed values together with audit steps; the orchestrator composes them
//! into a complete per-employee calculation and drives whole payroll runs.

mod accrual;
mod contributions;
mod income_tax;
mod leave_allowance;
mod minimum_wage;
mod orchestrator;

pub use accrual::{AccrualOutcome, resolve_accrual_rate};
pub use contributions::{ContributionOutcome, calculate_contributions};
pub use income_tax::{BracketLine, IncomeTaxOutcome, calculate_income_tax};
pub use leave_allowance::{LeaveAllowanceOutcome, MonthlyWage, calculate_leave_allowance};
pub use minimum_wage::{MinimumWageOutcome, validate_minimum_wage};
pub use orchestrator::{RunOutcome, calculate_payroll, process_run};
