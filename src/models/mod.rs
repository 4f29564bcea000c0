//! Core data models for the payroll calculation engine.
//!
//! This module contains all the domain models used throughout the engine.

mod calculation_result;
mod run;
mod snapshot;

pub use calculation_result::{
    AuditStep, AuditTrace, CalculationResult, CalculationStatus, ContributionLine, Finding,
    FindingKind, PayBreakdown,
};
pub use run::{LeaveAllowancePaymentRecord, PayrollRun, RunStatus};
pub use snapshot::{AllowanceInput, EmployeeCompensationSnapshot, PayPeriod};
