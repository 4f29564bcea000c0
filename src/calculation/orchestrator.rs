//! Payroll calculation orchestration.
//!
//! Composes the calculators into a single deterministic pipeline for one
//! employee, and drives a whole payroll run: gross build-up (including the
//! configured city transport allowance), social contributions, minimum-wage
//! validation, progressive income tax, and the net/employer-cost totals.

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::CountryConfiguration;
use crate::error::{EngineError, EngineResult};
use crate::ledger::RunLedger;
use crate::models::{
    AuditStep, AuditTrace, CalculationResult, CalculationStatus, EmployeeCompensationSnapshot,
    PayBreakdown,
};

use super::contributions::calculate_contributions;
use super::income_tax::calculate_income_tax;
use super::minimum_wage::validate_minimum_wage;

/// The outcome of processing a full payroll run.
#[derive(Debug)]
pub struct RunOutcome {
    /// Employee ids whose results were computed and recorded.
    pub recorded: Vec<String>,
    /// Per-employee failures; one employee's failure never aborts the rest.
    pub failures: Vec<(String, EngineError)>,
}

/// Calculates the complete payroll for one employee against one resolved
/// configuration version.
///
/// The pipeline is pure over its inputs: the same snapshot and configuration
/// always produce the same breakdown, findings, and audit trail. The net
/// salary and employer cost are derived by construction, so
/// `net + employee contributions + tax == gross` holds exactly and
/// `employer_cost == gross + employer contributions`.
///
/// # Errors
///
/// Propagates calculator errors (`InvalidBaseSalary`, `InvalidFiscalParts`);
/// minimum-wage problems surface as findings, not errors.
pub fn calculate_payroll(
    snapshot: &EmployeeCompensationSnapshot,
    config: &CountryConfiguration,
) -> EngineResult<CalculationResult> {
    if snapshot.country_code != config.country_code {
        return Err(EngineError::CalculationError {
            message: format!(
                "snapshot country '{}' does not match configuration country '{}'",
                snapshot.country_code, config.country_code
            ),
        });
    }

    let mut steps: Vec<AuditStep> = Vec::new();
    let mut step_number = 1u32;

    // Gross build-up: snapshot components plus the configured transport
    // allowance for the employee's city.
    let transport = snapshot
        .city
        .as_deref()
        .and_then(|city| config.transport_allowances.for_city(city))
        .unwrap_or(Decimal::ZERO);
    let gross_salary = snapshot.compensation_total() + transport;

    steps.push(AuditStep {
        step_number,
        rule_id: "gross_buildup".to_string(),
        rule_name: "Gross salary build-up".to_string(),
        rule_ref: "compensation".to_string(),
        input: serde_json::json!({
            "base_salary": snapshot.base_salary.to_string(),
            "allowances": snapshot.allowances.len(),
            "overtime": snapshot.overtime.map(|o| o.to_string()),
            "bonus": snapshot.bonus.map(|b| b.to_string()),
            "city": snapshot.city,
        }),
        output: serde_json::json!({
            "transport_allowance": transport.to_string(),
            "gross_salary": gross_salary.to_string(),
        }),
        reasoning: format!(
            "Compensation components {} + transport allowance {} = gross {}",
            snapshot.compensation_total(),
            transport,
            gross_salary
        ),
    });
    step_number += 1;

    // Minimum wage check on the contractual base, advisory only.
    let wage_check = validate_minimum_wage(
        &config.minimum_wages,
        snapshot.base_salary,
        &snapshot.category,
        &snapshot.sector_code,
        step_number,
    );
    steps.push(wage_check.audit_step);
    step_number += 1;

    let mut findings = Vec::new();
    if let Some(finding) = wage_check.finding {
        warn!(
            employee_id = %snapshot.employee_id,
            kind = ?finding.kind,
            "Minimum wage finding"
        );
        findings.push(finding);
    }

    let contributions =
        calculate_contributions(&config.contribution_schemes, gross_salary, step_number)?;
    step_number += contributions.audit_steps.len() as u32;
    steps.extend(contributions.audit_steps);

    let taxable_income = gross_salary - contributions.tax_base_deduction;
    let tax = calculate_income_tax(
        &config.tax_brackets,
        taxable_income,
        snapshot.fiscal_parts,
        step_number,
    )?;
    steps.push(tax.audit_step);

    let net_salary = gross_salary - contributions.employee_total - tax.tax;
    let employer_cost = gross_salary + contributions.employer_total;

    info!(
        employee_id = %snapshot.employee_id,
        %gross_salary,
        net_salary = %net_salary,
        findings = findings.len(),
        "Payroll calculated"
    );

    Ok(CalculationResult {
        calculation_id: Uuid::new_v4(),
        computed_at: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        employee_id: snapshot.employee_id.clone(),
        country_code: snapshot.country_code.clone(),
        period: snapshot.period.clone(),
        configuration_version: config.effective_from,
        status: CalculationStatus::Computed,
        breakdown: PayBreakdown {
            gross_salary,
            contributions: contributions.lines,
            taxable_income: tax.taxable_income,
            income_tax: tax.tax,
            net_salary,
            employer_cost,
        },
        findings,
        audit_trace: AuditTrace { steps },
    })
}

/// Processes a batch of employees for one draft run and records the results.
///
/// All employees in a run share the same configuration version, which the
/// caller resolves once for the run's calculation date. Per-employee
/// calculation errors are collected into the outcome; a run that is not
/// mutable fails the whole batch up front.
///
/// # Errors
///
/// `RunNotFound` / `RunNotMutable` when the run cannot accept writes.
pub fn process_run(
    ledger: &mut RunLedger,
    run_id: Uuid,
    config: &CountryConfiguration,
    snapshots: &[EmployeeCompensationSnapshot],
) -> EngineResult<RunOutcome> {
    ledger.ensure_mutable(run_id)?;

    let mut recorded = Vec::new();
    let mut failures = Vec::new();

    for snapshot in snapshots {
        match calculate_payroll(snapshot, config) {
            Ok(result) => {
                ledger.record_result(run_id, result)?;
                recorded.push(snapshot.employee_id.clone());
            }
            Err(err) => {
                warn!(
                    %run_id,
                    employee_id = %snapshot.employee_id,
                    error = %err,
                    "Employee calculation failed"
                );
                failures.push((snapshot.employee_id.clone(), err));
            }
        }
    }

    info!(
        %run_id,
        recorded = recorded.len(),
        failed = failures.len(),
        "Run processed"
    );

    Ok(RunOutcome { recorded, failures })
}
