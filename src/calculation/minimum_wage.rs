//! Statutory minimum-wage validation.
//!
//! Checks a base salary against the configured minimum-wage table for the
//! employee's category and sector. Violations and unmapped categories are
//! reported as findings on the result, never as calculation failures.

use rust_decimal::Decimal;

use crate::config::MinimumWageTable;
use crate::models::{AuditStep, Finding, FindingKind};

/// The result of the minimum-wage check.
#[derive(Debug, Clone)]
pub struct MinimumWageOutcome {
    /// A finding when the salary is below the floor or the category is
    /// unmapped; `None` when the check passes cleanly.
    pub finding: Option<Finding>,
    /// Audit step describing the check.
    pub audit_step: AuditStep,
}

/// Validates a base salary against the minimum-wage table.
///
/// This check is advisory: the calculation proceeds with the actual salary
/// either way, and any problem surfaces as a [`Finding`] for downstream
/// review rather than an error.
pub fn validate_minimum_wage(
    table: &MinimumWageTable,
    base_salary: Decimal,
    category: &str,
    sector_code: &str,
    step_number: u32,
) -> MinimumWageOutcome {
    let (finding, outcome_desc) = match table.lookup(category, sector_code) {
        Some(minimum) if base_salary < minimum => (
            Some(Finding {
                kind: FindingKind::MinimumWageViolation,
                message: format!(
                    "base salary {} is below the statutory minimum {} for category '{}' in sector '{}'",
                    base_salary, minimum, category, sector_code
                ),
            }),
            format!("below minimum {}", minimum),
        ),
        Some(minimum) => (None, format!("meets minimum {}", minimum)),
        None => (
            Some(Finding {
                kind: FindingKind::UnmappedCategory,
                message: format!(
                    "no minimum wage entry for category '{}' in sector '{}'; check skipped",
                    category, sector_code
                ),
            }),
            "category not mapped".to_string(),
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "minimum_wage_check".to_string(),
        rule_name: "Minimum wage validation".to_string(),
        rule_ref: format!("{}/{}", sector_code, category),
        input: serde_json::json!({
            "base_salary": base_salary.to_string(),
            "category": category,
            "sector_code": sector_code,
        }),
        output: serde_json::json!({
            "finding": finding.as_ref().map(|f| f.kind),
        }),
        reasoning: format!("Base salary {}: {}", base_salary, outcome_desc),
    };

    MinimumWageOutcome {
        finding,
        audit_step,
    }
}
