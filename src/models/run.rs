//! Payroll run and payment-record models.
//!
//! A [`PayrollRun`] groups the calculations for one country and period;
//! every employee in a run is evaluated under the same resolved
//! configuration snapshot. [`LeaveAllowancePaymentRecord`] is the append-only
//! proof that a special leave allowance was paid, used to reject duplicates.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PayPeriod;

/// Lifecycle state of a payroll run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Results may still be recalculated and superseded.
    Draft,
    /// Read-only; any further write fails with `RunNotMutable`.
    Approved,
}

/// One payroll run for a country and period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRun {
    /// Unique identifier of the run.
    pub run_id: Uuid,
    /// Country whose configuration the run was resolved against.
    pub country_code: String,
    /// The period the run covers.
    pub period: PayPeriod,
    /// Draft or approved.
    pub status: RunStatus,
}

impl PayrollRun {
    /// Returns true while the run still accepts writes.
    pub fn is_mutable(&self) -> bool {
        self.status == RunStatus::Draft
    }
}

/// Append-only record of one special leave allowance payment.
///
/// Exactly one record may exist per (employee, run); its presence makes a
/// second computation for the same pair fail rather than silently recompute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveAllowancePaymentRecord {
    /// The employee the allowance was paid to.
    pub employee_id: String,
    /// The payroll run the payment belongs to.
    pub run_id: Uuid,
    /// The date the allowance was paid.
    pub payment_date: NaiveDate,
    /// Total of the reference-window wages the daily wage was derived from.
    pub reference_wage_total: Decimal,
    /// Number of months of wage history used.
    pub reference_months_used: u32,
    /// Leave days cashed out.
    pub leave_days: Decimal,
    /// The computed allowance amount.
    pub amount: Decimal,
}
