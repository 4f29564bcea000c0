//! Special leave allowance (paid-leave indemnity) calculation.
//!
//! The allowance is paid once per (employee, run) from a trailing average of
//! the employee's recent monthly wages: average the most recent reference
//! months, divide by the policy's days-per-month to get a daily wage, and
//! multiply by the leave days taken.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::config::{LeaveAllowancePolicy, RoundingPolicy};
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, LeaveAllowancePaymentRecord};

/// One month of historical wages feeding the reference average.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyWage {
    /// First day of the month the wage was paid for.
    pub month: NaiveDate,
    /// Gross wage paid for that month.
    pub gross: Decimal,
}

/// The computed allowance plus the payment record to persist.
#[derive(Debug, Clone)]
pub struct LeaveAllowanceOutcome {
    /// The rounded allowance amount.
    pub amount: Decimal,
    /// Record of the payment, keyed by (employee, run) for idempotency.
    pub record: LeaveAllowancePaymentRecord,
    /// Audit step describing the averaging and the final amount.
    pub audit_step: AuditStep,
}

/// Computes the special leave allowance for one employee in one run.
///
/// The reference window is the most recent `policy.reference_months` entries
/// of `reference_wages` by month; a shorter history is averaged over the
/// months actually present, never padded with zeros. The caller passes
/// `already_paid` from the run ledger so the same (employee, run) pair can
/// never be paid twice.
///
/// # Errors
///
/// - `DuplicateAllowancePayment` when `already_paid` is set.
/// - `InsufficientHistory` when `reference_wages` is empty.
pub fn calculate_leave_allowance(
    policy: &LeaveAllowancePolicy,
    employee_id: &str,
    run_id: Uuid,
    reference_wages: &[MonthlyWage],
    leave_days: Decimal,
    payment_date: NaiveDate,
    already_paid: bool,
    step_number: u32,
) -> EngineResult<LeaveAllowanceOutcome> {
    if already_paid {
        return Err(EngineError::DuplicateAllowancePayment {
            employee_id: employee_id.to_string(),
            run_id,
        });
    }
    if reference_wages.is_empty() {
        return Err(EngineError::InsufficientHistory {
            employee_id: employee_id.to_string(),
            payment_date,
        });
    }

    let mut window: Vec<&MonthlyWage> = reference_wages.iter().collect();
    window.sort_by_key(|w| w.month);
    let take = policy.reference_months as usize;
    if window.len() > take {
        window.drain(..window.len() - take);
    }

    let months_used = window.len() as u32;
    let wage_total: Decimal = window.iter().map(|w| w.gross).sum();
    let average_monthly = wage_total / Decimal::from(months_used);
    let daily_wage = average_monthly / policy.days_per_month;
    let amount = RoundingPolicy::HalfUp.apply(daily_wage * leave_days);

    let audit_step = AuditStep {
        step_number,
        rule_id: "leave_allowance".to_string(),
        rule_name: "Special leave allowance".to_string(),
        rule_ref: "leave_allowance_policy".to_string(),
        input: serde_json::json!({
            "employee_id": employee_id,
            "reference_months": policy.reference_months,
            "months_available": reference_wages.len(),
            "leave_days": leave_days.to_string(),
        }),
        output: serde_json::json!({
            "months_used": months_used,
            "average_monthly_wage": average_monthly.to_string(),
            "daily_wage": daily_wage.to_string(),
            "amount": amount.to_string(),
        }),
        reasoning: format!(
            "Average of {} month(s) = {}; daily wage {} / {} = {}; × {} leave days = {}",
            months_used,
            average_monthly,
            average_monthly,
            policy.days_per_month,
            daily_wage,
            leave_days,
            amount
        ),
    };

    let record = LeaveAllowancePaymentRecord {
        employee_id: employee_id.to_string(),
        run_id,
        payment_date,
        reference_wage_total: wage_total,
        reference_months_used: months_used,
        leave_days,
        amount,
    };

    Ok(LeaveAllowanceOutcome {
        amount,
        record,
        audit_step,
    })
}
