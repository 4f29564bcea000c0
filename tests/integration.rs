//! End-to-end tests running the full pipeline against the shipped
//! configuration files, exercising the documented scenarios.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use payroll_engine::calculation::{
    calculate_leave_allowance, calculate_payroll, process_run, resolve_accrual_rate, MonthlyWage,
};
use payroll_engine::config::ConfigResolver;
use payroll_engine::error::EngineError;
use payroll_engine::ledger::RunLedger;
use payroll_engine::models::{
    CalculationStatus, EmployeeCompensationSnapshot, FindingKind, PayPeriod, RunStatus,
};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::from_str(s).unwrap()
}

fn june_2025() -> PayPeriod {
    PayPeriod {
        start_date: date("2025-06-01"),
        end_date: date("2025-06-30"),
    }
}

fn civ_snapshot(employee_id: &str, base_salary: &str) -> EmployeeCompensationSnapshot {
    EmployeeCompensationSnapshot {
        employee_id: employee_id.to_string(),
        country_code: "civ".to_string(),
        period: june_2025(),
        calculation_date: date("2025-06-30"),
        base_salary: dec(base_salary),
        allowances: vec![],
        overtime: None,
        bonus: None,
        fiscal_parts: dec("1"),
        age: 34,
        seniority_years: 6,
        category: "A1".to_string(),
        sector_code: "general".to_string(),
        city: None,
    }
}

/// Scenario: a single-earner salary of 180,000 under the 2025 civ rules.
/// Pension 6.3% and the flat 1,000 health contribution reduce the tax base
/// to 167,660 before the progressive schedule applies.
#[test]
fn test_civ_standard_worker_2025() {
    let resolver = ConfigResolver::load("config").unwrap();
    let config = resolver.resolve("civ", date("2025-06-30")).unwrap();

    let result = calculate_payroll(&civ_snapshot("emp_001", "180000"), config).unwrap();
    let b = &result.breakdown;

    assert_eq!(b.gross_salary, dec("180000"));
    assert_eq!(b.taxable_income, dec("167660"));
    assert_eq!(b.income_tax, dec("14825.60"));
    assert_eq!(b.net_salary, dec("152834.40"));
    assert_eq!(b.employer_cost, dec("194860"));
    assert!(result.findings.is_empty());
    assert_eq!(result.configuration_version, date("2025-01-01"));
    assert!(!result.audit_trace.steps.is_empty());
}

/// Scenario: a high earner in sen where the pension base is capped at
/// 360,000; the employee amount is 20,160, well below the nominal
/// 5.6% of the 500,000 gross.
#[test]
fn test_sen_pension_ceiling_compresses_contribution() {
    let resolver = ConfigResolver::load("config").unwrap();
    let config = resolver.resolve("sen", date("2025-06-30")).unwrap();

    let mut snapshot = civ_snapshot("emp_sen", "500000");
    snapshot.country_code = "sen".to_string();

    let result = calculate_payroll(&snapshot, config).unwrap();
    let pension = result
        .breakdown
        .contributions
        .iter()
        .find(|l| l.scheme_code == "ipres_general")
        .unwrap();

    assert_eq!(pension.effective_base, dec("360000"));
    assert_eq!(pension.employee_amount, dec("20160"));
    assert!(pension.employee_amount < dec("500000") * dec("0.056"));
}

/// Scenario: a category with no minimum-wage mapping yields an
/// `UnmappedCategory` finding while the calculation still completes.
#[test]
fn test_unmapped_category_completes_with_finding() {
    let resolver = ConfigResolver::load("config").unwrap();
    let config = resolver.resolve("civ", date("2025-06-30")).unwrap();

    let mut snapshot = civ_snapshot("emp_002", "180000");
    snapshot.category = "Z9".to_string();

    let result = calculate_payroll(&snapshot, config).unwrap();
    assert_eq!(result.findings.len(), 1);
    assert_eq!(result.findings[0].kind, FindingKind::UnmappedCategory);
    assert!(result.breakdown.net_salary > Decimal::ZERO);
}

/// Scenario: an 19-year-old accrues at the youth override rate of 2.5
/// days per month instead of the standard 2.2.
#[test]
fn test_civ_youth_accrual_rate() {
    let resolver = ConfigResolver::load("config").unwrap();
    let config = resolver.resolve("civ", date("2025-06-30")).unwrap();

    let outcome = resolve_accrual_rate(&config.accrual, 19, 1, 1);
    assert_eq!(outcome.monthly_days, dec("2.5"));
    assert_eq!(outcome.override_rule.as_deref(), Some("youth_rate"));

    let standard = resolve_accrual_rate(&config.accrual, 34, 6, 1);
    assert_eq!(standard.monthly_days, dec("2.2"));
}

/// Scenario: a recalculation attempt against an approved run fails with
/// `RunNotMutable` and the stored result stays exactly as approved.
#[test]
fn test_approved_run_is_immutable() {
    let resolver = ConfigResolver::load("config").unwrap();
    let config = resolver.resolve("civ", date("2025-06-30")).unwrap();

    let mut ledger = RunLedger::new();
    let run_id = ledger.open_run("civ", june_2025());

    let snapshot = civ_snapshot("emp_001", "180000");
    process_run(&mut ledger, run_id, config, std::slice::from_ref(&snapshot)).unwrap();
    ledger.approve_run(run_id).unwrap();

    let approved = ledger.result(run_id, "emp_001").unwrap().clone();
    assert_eq!(approved.status, CalculationStatus::Approved);
    assert_eq!(ledger.run(run_id).unwrap().status, RunStatus::Approved);

    let retry = process_run(&mut ledger, run_id, config, &[snapshot]);
    assert!(matches!(
        retry.unwrap_err(),
        EngineError::RunNotMutable { .. }
    ));

    // The stored result is untouched by the rejected write.
    assert_eq!(*ledger.result(run_id, "emp_001").unwrap(), approved);
}

/// The 2026 civ version changes the flat health amount and the first
/// bracket, so the same snapshot nets a different amount across the
/// effective-date boundary.
#[test]
fn test_config_version_switch_changes_result() {
    let resolver = ConfigResolver::load("config").unwrap();

    let snapshot_2025 = civ_snapshot("emp_001", "180000");
    let mut snapshot_2026 = snapshot_2025.clone();
    snapshot_2026.period = PayPeriod {
        start_date: date("2026-06-01"),
        end_date: date("2026-06-30"),
    };
    snapshot_2026.calculation_date = date("2026-06-30");

    let config_2025 = resolver.resolve("civ", snapshot_2025.calculation_date).unwrap();
    let config_2026 = resolver.resolve("civ", snapshot_2026.calculation_date).unwrap();

    let r_2025 = calculate_payroll(&snapshot_2025, config_2025).unwrap();
    let r_2026 = calculate_payroll(&snapshot_2026, config_2026).unwrap();

    assert_eq!(r_2025.configuration_version, date("2025-01-01"));
    assert_eq!(r_2026.configuration_version, date("2026-01-01"));
    assert_ne!(r_2025.breakdown.net_salary, r_2026.breakdown.net_salary);
}

/// A date before any configured version is an error, never a fallback.
#[test]
fn test_no_fallback_before_first_version() {
    let resolver = ConfigResolver::load("config").unwrap();
    let result = resolver.resolve("civ", date("2024-06-30"));
    assert!(matches!(
        result.unwrap_err(),
        EngineError::ConfigurationNotFound { .. }
    ));
}

/// Full run lifecycle: draft, compute a batch, recalculate one employee,
/// approve; the superseded result survives for audit.
#[test]
fn test_run_lifecycle_with_supersede() {
    let resolver = ConfigResolver::load("config").unwrap();
    let config = resolver.resolve("civ", date("2025-06-30")).unwrap();

    let mut ledger = RunLedger::new();
    let run_id = ledger.open_run("civ", june_2025());

    let snapshots = vec![
        civ_snapshot("emp_001", "180000"),
        civ_snapshot("emp_002", "250000"),
    ];
    let outcome = process_run(&mut ledger, run_id, config, &snapshots).unwrap();
    assert_eq!(outcome.recorded.len(), 2);
    assert!(outcome.failures.is_empty());

    // Correction for one employee before approval.
    let mut corrected = civ_snapshot("emp_002", "260000");
    corrected.seniority_years = 7;
    process_run(&mut ledger, run_id, config, &[corrected]).unwrap();

    assert_eq!(ledger.superseded_results(run_id).len(), 1);
    assert_eq!(
        ledger.superseded_results(run_id)[0].status,
        CalculationStatus::Superseded
    );
    assert_eq!(
        ledger.result(run_id, "emp_002").unwrap().breakdown.gross_salary,
        dec("260000")
    );

    ledger.approve_run(run_id).unwrap();
    assert_eq!(
        ledger.result(run_id, "emp_001").unwrap().status,
        CalculationStatus::Approved
    );
}

/// Leave allowance paid through the ledger is idempotent per (employee, run).
#[test]
fn test_leave_allowance_once_per_run() {
    let resolver = ConfigResolver::load("config").unwrap();
    let config = resolver.resolve("civ", date("2025-06-30")).unwrap();

    let mut ledger = RunLedger::new();
    let run_id = ledger.open_run("civ", june_2025());

    let history: Vec<MonthlyWage> = (1..=12)
        .map(|m| MonthlyWage {
            month: NaiveDate::from_ymd_opt(2024, m, 1).unwrap(),
            gross: dec("180000"),
        })
        .collect();

    let outcome = calculate_leave_allowance(
        &config.leave_allowance,
        "emp_001",
        run_id,
        &history,
        dec("15"),
        date("2025-06-15"),
        ledger.has_allowance_payment(run_id, "emp_001"),
        1,
    )
    .unwrap();
    assert_eq!(outcome.amount, dec("90000"));

    ledger.record_allowance_payment(outcome.record).unwrap();
    assert!(ledger.has_allowance_payment(run_id, "emp_001"));

    // A second attempt sees the recorded payment and is rejected.
    let retry = calculate_leave_allowance(
        &config.leave_allowance,
        "emp_001",
        run_id,
        &history,
        dec("15"),
        date("2025-06-20"),
        ledger.has_allowance_payment(run_id, "emp_001"),
        1,
    );
    assert!(matches!(
        retry.unwrap_err(),
        EngineError::DuplicateAllowancePayment { .. }
    ));
}

/// Balance invariants hold on every shipped configuration for a spread of
/// salaries and family situations.
#[test]
fn test_balance_invariants_across_shipped_configs() {
    let resolver = ConfigResolver::load("config").unwrap();

    for (country, salary, parts) in [
        ("civ", "95000", "1"),
        ("civ", "450000", "2.5"),
        ("civ", "4000000", "3"),
        ("sen", "120000", "1.5"),
        ("sen", "900000", "4"),
    ] {
        let config = resolver.resolve(country, date("2025-06-30")).unwrap();
        let mut snapshot = civ_snapshot("emp_x", salary);
        snapshot.country_code = country.to_string();
        snapshot.fiscal_parts = dec(parts);

        let result = calculate_payroll(&snapshot, config).unwrap();
        let b = &result.breakdown;

        assert_eq!(
            b.net_salary + b.employee_contributions() + b.income_tax,
            b.gross_salary,
            "balance broke for {} at {}",
            country,
            salary
        );
        assert_eq!(
            b.employer_cost,
            b.gross_salary + b.employer_contributions(),
            "employer cost broke for {} at {}",
            country,
            salary
        );
    }
}
