//! Social-contribution calculation.
//!
//! Applies each configured contribution scheme to a gross salary: the base
//! is clamped to the scheme's floor/ceiling, rates produce employee and
//! employer amounts under the scheme's declared rounding policy, and flat
//! schemes contribute their fixed sums.

use rust_decimal::Decimal;

use crate::config::{ContributionScheme, SchemeBasis};
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, ContributionLine};

/// The result of applying all contribution schemes to a gross salary.
#[derive(Debug, Clone)]
pub struct ContributionOutcome {
    /// Per-scheme contribution lines, in configuration order.
    pub lines: Vec<ContributionLine>,
    /// Sum of all employee-side amounts.
    pub employee_total: Decimal,
    /// Sum of all employer-side amounts.
    pub employer_total: Decimal,
    /// Sum of employee amounts of schemes flagged as reducing the tax base.
    pub tax_base_deduction: Decimal,
    /// One audit step per scheme, in application order.
    pub audit_steps: Vec<AuditStep>,
}

/// Applies each scheme to the gross salary.
///
/// For every scheme the effective base is
/// `clamp(gross, floor ?? 0, ceiling ?? +inf)`; a ceiling below the gross
/// therefore yields an employee amount strictly below nominal-rate × gross,
/// and that compression is visible in the per-line effective base.
///
/// # Arguments
///
/// * `schemes` - The contribution schemes from the resolved configuration
/// * `gross_salary` - The built-up gross salary the bases derive from
/// * `first_step_number` - The step number of the first emitted audit step
///
/// # Errors
///
/// `InvalidBaseSalary` when the gross salary is negative.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_contributions;
/// use payroll_engine::config::{ContributionScheme, RoundingPolicy, SchemeBasis};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let schemes = vec![ContributionScheme {
///     code: "cnps_pension".to_string(),
///     name: "CNPS pension".to_string(),
///     basis: SchemeBasis::Rated {
///         employee_rate: Decimal::from_str("0.063").unwrap(),
///         employer_rate: Decimal::from_str("0.077").unwrap(),
///     },
///     base_floor: None,
///     base_ceiling: None,
///     rounding: RoundingPolicy::HalfUp,
///     reduces_tax_base: true,
/// }];
///
/// let outcome = calculate_contributions(&schemes, Decimal::from(180_000), 1).unwrap();
/// assert_eq!(outcome.employee_total, Decimal::from(11_340));
/// assert_eq!(outcome.employer_total, Decimal::from(13_860));
/// ```
pub fn calculate_contributions(
    schemes: &[ContributionScheme],
    gross_salary: Decimal,
    first_step_number: u32,
) -> EngineResult<ContributionOutcome> {
    if gross_salary < Decimal::ZERO {
        return Err(EngineError::InvalidBaseSalary {
            value: gross_salary,
            message: "gross salary must not be negative".to_string(),
        });
    }

    let mut lines = Vec::with_capacity(schemes.len());
    let mut audit_steps = Vec::with_capacity(schemes.len());
    let mut employee_total = Decimal::ZERO;
    let mut employer_total = Decimal::ZERO;
    let mut tax_base_deduction = Decimal::ZERO;

    for (offset, scheme) in schemes.iter().enumerate() {
        let floor = scheme.base_floor.unwrap_or(Decimal::ZERO);
        let effective_base = match scheme.base_ceiling {
            Some(ceiling) => gross_salary.clamp(floor, ceiling),
            None => gross_salary.max(floor),
        };

        let (employee_amount, employer_amount, basis_desc) = match &scheme.basis {
            SchemeBasis::Rated {
                employee_rate,
                employer_rate,
            } => {
                let employee = scheme.rounding.apply(effective_base * employee_rate);
                let employer = scheme.rounding.apply(effective_base * employer_rate);
                (
                    employee,
                    employer,
                    format!("{} × {}", effective_base, employee_rate),
                )
            }
            SchemeBasis::Flat {
                employee_amount,
                employer_amount,
            } => (
                scheme.rounding.apply(*employee_amount),
                scheme.rounding.apply(*employer_amount),
                format!("flat {}", employee_amount),
            ),
        };

        let clamped = effective_base != gross_salary;
        audit_steps.push(AuditStep {
            step_number: first_step_number + offset as u32,
            rule_id: "contribution_scheme".to_string(),
            rule_name: format!("Contribution: {}", scheme.name),
            rule_ref: scheme.code.clone(),
            input: serde_json::json!({
                "gross_salary": gross_salary.to_string(),
                "base_floor": scheme.base_floor.map(|f| f.to_string()),
                "base_ceiling": scheme.base_ceiling.map(|c| c.to_string()),
            }),
            output: serde_json::json!({
                "effective_base": effective_base.to_string(),
                "base_clamped": clamped,
                "employee_amount": employee_amount.to_string(),
                "employer_amount": employer_amount.to_string(),
            }),
            reasoning: if clamped {
                format!(
                    "Base clamped from {} to {}; employee amount = {}",
                    gross_salary, effective_base, basis_desc
                )
            } else {
                format!("Employee amount = {}", basis_desc)
            },
        });

        employee_total += employee_amount;
        employer_total += employer_amount;
        if scheme.reduces_tax_base {
            tax_base_deduction += employee_amount;
        }

        lines.push(ContributionLine {
            scheme_code: scheme.code.clone(),
            scheme_name: scheme.name.clone(),
            effective_base,
            employee_amount,
            employer_amount,
            reduces_tax_base: scheme.reduces_tax_base,
        });
    }

    Ok(ContributionOutcome {
        lines,
        employee_total,
        employer_total,
        tax_base_deduction,
        audit_steps,
    })
}
