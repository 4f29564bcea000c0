//! In-memory run ledger with the engine's persistence contract.
//!
//! Backing storage is an external collaborator, but the transactional
//! semantics the engine requires of it live here: a result write for a
//! (run, employee) key atomically supersedes the prior live result, an
//! approved run rejects every write, and special leave allowance payment
//! records are append-only with at most one per (employee, run).

use std::collections::HashMap;

use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    CalculationResult, CalculationStatus, LeaveAllowancePaymentRecord, PayPeriod, PayrollRun,
    RunStatus,
};

/// Stores payroll runs, their live results, and allowance payment records.
///
/// # Example
///
/// ```
/// use payroll_engine::ledger::RunLedger;
/// use payroll_engine::models::PayPeriod;
/// use chrono::NaiveDate;
///
/// let mut ledger = RunLedger::new();
/// let run_id = ledger.open_run("civ", PayPeriod {
///     start_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
/// });
/// assert!(ledger.run(run_id).unwrap().is_mutable());
/// ```
#[derive(Debug, Default)]
pub struct RunLedger {
    runs: HashMap<Uuid, PayrollRun>,
    /// Live result per (run, employee).
    results: HashMap<(Uuid, String), CalculationResult>,
    /// Retired results, kept for the audit history.
    superseded: Vec<(Uuid, CalculationResult)>,
    payments: HashMap<(Uuid, String), LeaveAllowancePaymentRecord>,
}

impl RunLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a new draft payroll run and returns its id.
    pub fn open_run(&mut self, country_code: &str, period: PayPeriod) -> Uuid {
        let run_id = Uuid::new_v4();
        self.runs.insert(
            run_id,
            PayrollRun {
                run_id,
                country_code: country_code.to_string(),
                period,
                status: RunStatus::Draft,
            },
        );
        info!(%run_id, country = country_code, "Opened draft payroll run");
        run_id
    }

    /// Looks up a run by id.
    pub fn run(&self, run_id: Uuid) -> EngineResult<&PayrollRun> {
        self.runs
            .get(&run_id)
            .ok_or(EngineError::RunNotFound { run_id })
    }

    /// Fails with `RunNotMutable` unless the run exists and is in draft.
    pub fn ensure_mutable(&self, run_id: Uuid) -> EngineResult<()> {
        let run = self.run(run_id)?;
        if !run.is_mutable() {
            return Err(EngineError::RunNotMutable { run_id });
        }
        Ok(())
    }

    /// Records a calculation result for (run, employee).
    ///
    /// The write is idempotent per key: a prior live result for the same
    /// employee is retired with status `Superseded` and replaced atomically,
    /// so the key never has two live results.
    ///
    /// # Errors
    ///
    /// `RunNotMutable` when the run is approved; the stored result is left
    /// untouched.
    pub fn record_result(
        &mut self,
        run_id: Uuid,
        mut result: CalculationResult,
    ) -> EngineResult<()> {
        self.ensure_mutable(run_id)?;

        result.status = CalculationStatus::Computed;
        let key = (run_id, result.employee_id.clone());
        if let Some(mut prior) = self.results.insert(key, result) {
            prior.status = CalculationStatus::Superseded;
            debug!(
                %run_id,
                employee_id = %prior.employee_id,
                superseded_id = %prior.calculation_id,
                "Superseded prior calculation result"
            );
            self.superseded.push((run_id, prior));
        }
        Ok(())
    }

    /// Returns the live result for (run, employee), if one was recorded.
    pub fn result(&self, run_id: Uuid, employee_id: &str) -> Option<&CalculationResult> {
        self.results.get(&(run_id, employee_id.to_string()))
    }

    /// Returns the retired results for a run, oldest first.
    pub fn superseded_results(&self, run_id: Uuid) -> Vec<&CalculationResult> {
        self.superseded
            .iter()
            .filter(|(id, _)| *id == run_id)
            .map(|(_, r)| r)
            .collect()
    }

    /// Approves a run, freezing it and flipping every live result to
    /// `Approved`. Approval is terminal.
    pub fn approve_run(&mut self, run_id: Uuid) -> EngineResult<()> {
        self.ensure_mutable(run_id)?;

        if let Some(run) = self.runs.get_mut(&run_id) {
            run.status = RunStatus::Approved;
        }
        for ((id, _), result) in self.results.iter_mut() {
            if *id == run_id && !result.status.is_terminal() {
                result.status = CalculationStatus::Approved;
            }
        }
        info!(%run_id, "Approved payroll run");
        Ok(())
    }

    /// Returns true when an allowance payment is already recorded for
    /// (run, employee).
    pub fn has_allowance_payment(&self, run_id: Uuid, employee_id: &str) -> bool {
        self.payments
            .contains_key(&(run_id, employee_id.to_string()))
    }

    /// Appends an allowance payment record.
    ///
    /// # Errors
    ///
    /// - `RunNotMutable` when the run is approved.
    /// - `DuplicateAllowancePayment` when a record already exists for the
    ///   (employee, run) pair; the existing record is never replaced.
    pub fn record_allowance_payment(
        &mut self,
        record: LeaveAllowancePaymentRecord,
    ) -> EngineResult<()> {
        self.ensure_mutable(record.run_id)?;

        let key = (record.run_id, record.employee_id.clone());
        if self.payments.contains_key(&key) {
            return Err(EngineError::DuplicateAllowancePayment {
                employee_id: record.employee_id,
                run_id: record.run_id,
            });
        }
        self.payments.insert(key, record);
        Ok(())
    }

    /// Returns the allowance payment record for (run, employee), if any.
    pub fn allowance_payment(
        &self,
        run_id: Uuid,
        employee_id: &str,
    ) -> Option<&LeaveAllowancePaymentRecord> {
        self.payments.get(&(run_id, employee_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AuditTrace, PayBreakdown};
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;

    fn period() -> PayPeriod {
        PayPeriod {
            start_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
        }
    }

    fn sample_result(employee_id: &str) -> CalculationResult {
        CalculationResult {
            calculation_id: Uuid::new_v4(),
            computed_at: Utc::now(),
            engine_version: "0.1.0".to_string(),
            employee_id: employee_id.to_string(),
            country_code: "civ".to_string(),
            period: period(),
            configuration_version: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            status: CalculationStatus::Computed,
            breakdown: PayBreakdown {
                gross_salary: Decimal::from(180000),
                contributions: vec![],
                taxable_income: Decimal::from(180000),
                income_tax: Decimal::ZERO,
                net_salary: Decimal::from(180000),
                employer_cost: Decimal::from(180000),
            },
            findings: vec![],
            audit_trace: AuditTrace::default(),
        }
    }

    fn sample_payment(run_id: Uuid, employee_id: &str) -> LeaveAllowancePaymentRecord {
        LeaveAllowancePaymentRecord {
            employee_id: employee_id.to_string(),
            run_id,
            payment_date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            reference_wage_total: Decimal::from(2160000),
            reference_months_used: 12,
            leave_days: Decimal::from(12),
            amount: Decimal::from(72000),
        }
    }

    #[test]
    fn test_open_run_starts_in_draft() {
        let mut ledger = RunLedger::new();
        let run_id = ledger.open_run("civ", period());
        assert_eq!(ledger.run(run_id).unwrap().status, RunStatus::Draft);
    }

    #[test]
    fn test_unknown_run_returns_error() {
        let ledger = RunLedger::new();
        assert!(matches!(
            ledger.run(Uuid::nil()).unwrap_err(),
            EngineError::RunNotFound { .. }
        ));
    }

    #[test]
    fn test_record_and_read_back_result() {
        let mut ledger = RunLedger::new();
        let run_id = ledger.open_run("civ", period());

        ledger.record_result(run_id, sample_result("emp_001")).unwrap();

        let stored = ledger.result(run_id, "emp_001").unwrap();
        assert_eq!(stored.status, CalculationStatus::Computed);
    }

    #[test]
    fn test_recalculation_supersedes_prior_result() {
        let mut ledger = RunLedger::new();
        let run_id = ledger.open_run("civ", period());

        let first = sample_result("emp_001");
        let first_id = first.calculation_id;
        ledger.record_result(run_id, first).unwrap();

        let second = sample_result("emp_001");
        let second_id = second.calculation_id;
        ledger.record_result(run_id, second).unwrap();

        // Exactly one live result, and it is the later one.
        let live = ledger.result(run_id, "emp_001").unwrap();
        assert_eq!(live.calculation_id, second_id);

        let retired = ledger.superseded_results(run_id);
        assert_eq!(retired.len(), 1);
        assert_eq!(retired[0].calculation_id, first_id);
        assert_eq!(retired[0].status, CalculationStatus::Superseded);
    }

    #[test]
    fn test_approve_freezes_results() {
        let mut ledger = RunLedger::new();
        let run_id = ledger.open_run("civ", period());
        ledger.record_result(run_id, sample_result("emp_001")).unwrap();

        ledger.approve_run(run_id).unwrap();

        assert_eq!(ledger.run(run_id).unwrap().status, RunStatus::Approved);
        assert_eq!(
            ledger.result(run_id, "emp_001").unwrap().status,
            CalculationStatus::Approved
        );
    }

    #[test]
    fn test_write_to_approved_run_fails_and_preserves_result() {
        let mut ledger = RunLedger::new();
        let run_id = ledger.open_run("civ", period());

        let first = sample_result("emp_001");
        let first_id = first.calculation_id;
        ledger.record_result(run_id, first).unwrap();
        ledger.approve_run(run_id).unwrap();

        let result = ledger.record_result(run_id, sample_result("emp_001"));
        assert!(matches!(
            result.unwrap_err(),
            EngineError::RunNotMutable { .. }
        ));

        // The approved result is untouched.
        let stored = ledger.result(run_id, "emp_001").unwrap();
        assert_eq!(stored.calculation_id, first_id);
        assert_eq!(stored.status, CalculationStatus::Approved);
    }

    #[test]
    fn test_approving_twice_fails() {
        let mut ledger = RunLedger::new();
        let run_id = ledger.open_run("civ", period());
        ledger.approve_run(run_id).unwrap();

        assert!(matches!(
            ledger.approve_run(run_id).unwrap_err(),
            EngineError::RunNotMutable { .. }
        ));
    }

    #[test]
    fn test_results_for_different_employees_are_independent() {
        let mut ledger = RunLedger::new();
        let run_id = ledger.open_run("civ", period());

        ledger.record_result(run_id, sample_result("emp_001")).unwrap();
        ledger.record_result(run_id, sample_result("emp_002")).unwrap();

        assert!(ledger.result(run_id, "emp_001").is_some());
        assert!(ledger.result(run_id, "emp_002").is_some());
        assert!(ledger.superseded_results(run_id).is_empty());
    }

    #[test]
    fn test_allowance_payment_recorded_once() {
        let mut ledger = RunLedger::new();
        let run_id = ledger.open_run("civ", period());

        ledger
            .record_allowance_payment(sample_payment(run_id, "emp_001"))
            .unwrap();
        assert!(ledger.has_allowance_payment(run_id, "emp_001"));

        let result = ledger.record_allowance_payment(sample_payment(run_id, "emp_001"));
        match result.unwrap_err() {
            EngineError::DuplicateAllowancePayment { employee_id, .. } => {
                assert_eq!(employee_id, "emp_001");
            }
            other => panic!("Expected DuplicateAllowancePayment, got {:?}", other),
        }
    }

    #[test]
    fn test_allowance_payment_on_approved_run_fails() {
        let mut ledger = RunLedger::new();
        let run_id = ledger.open_run("civ", period());
        ledger.approve_run(run_id).unwrap();

        let result = ledger.record_allowance_payment(sample_payment(run_id, "emp_001"));
        assert!(matches!(
            result.unwrap_err(),
            EngineError::RunNotMutable { .. }
        ));
    }
}
