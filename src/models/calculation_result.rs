//! Calculation result models for the payroll engine.
//!
//! This module contains the [`CalculationResult`] type and its associated
//! structures that capture all outputs from a payroll calculation, including
//! the contribution breakdown, tax, findings, and the audit trail.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PayPeriod;

/// Lifecycle state of one calculation attempt.
///
/// A calculation moves `pending → resolved → computed` and then terminates in
/// exactly one of `approved`, `superseded` or `failed`. The engine itself
/// assigns `computed`, `superseded` and `approved`; `pending` and `resolved`
/// are stamped by the surrounding workflow while it stages inputs and
/// resolves configuration, and `failed` marks an attempt that workflow
/// persisted after a fatal calculation error (the engine reports such errors
/// without storing a result body).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationStatus {
    /// Created, configuration not yet resolved.
    Pending,
    /// Configuration resolved, computation not yet performed.
    Resolved,
    /// Computation completed; the live result while the run is in draft.
    Computed,
    /// Frozen by run approval; terminal and immutable.
    Approved,
    /// Replaced by a recalculation while the run was in draft; terminal.
    Superseded,
    /// A fatal error aborted the calculation; terminal.
    Failed,
}

impl CalculationStatus {
    /// Returns true for the terminal states that accept no further
    /// transition.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CalculationStatus::Approved
                | CalculationStatus::Superseded
                | CalculationStatus::Failed
        )
    }
}

/// One contribution scheme's amounts within a calculation.
///
/// The effective base is reported so a ceiling-compressed effective rate is
/// directly inspectable rather than hidden inside an aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionLine {
    /// Code of the scheme this line was produced by.
    pub scheme_code: String,
    /// Human-readable scheme name.
    pub scheme_name: String,
    /// The clamped base the rates were applied to.
    pub effective_base: Decimal,
    /// Amount withheld from the employee.
    pub employee_amount: Decimal,
    /// Amount borne by the employer.
    pub employer_amount: Decimal,
    /// Whether the employee amount reduced the tax base.
    pub reduces_tax_base: bool,
}

/// Kind of a non-fatal compliance finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// Base salary is below the configured category/sector minimum.
    MinimumWageViolation,
    /// No minimum-wage entry exists for the category/sector combination.
    UnmappedCategory,
}

/// A non-fatal compliance finding returned alongside a valid result.
///
/// Findings never abort a calculation; callers decide whether to block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// The finding kind.
    pub kind: FindingKind,
    /// Human-readable description with the offending values.
    pub message: String,
}

/// A single step in the audit trail recording a rule application.
///
/// Each step captures the input, output, and reasoning for one decision so
/// the calculation can be reconstructed for a government filing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// Reference to the configuration element that justified the step
    /// (scheme code, bracket range, accrual rule id).
    pub rule_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// The complete audit trail for a calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps, in application order.
    pub steps: Vec<AuditStep>,
}

/// The monetary breakdown of one payroll calculation.
///
/// By construction the balance invariants hold:
/// `net_salary + employee deductions + income_tax = gross_salary` and
/// `employer_cost = gross_salary + employer contributions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayBreakdown {
    /// Gross salary (base + allowances + overtime + bonus + transport).
    pub gross_salary: Decimal,
    /// Per-scheme contribution lines, in configuration order.
    pub contributions: Vec<ContributionLine>,
    /// Gross minus the tax-base-reducing employee contributions.
    pub taxable_income: Decimal,
    /// Income tax after family-quotient division.
    pub income_tax: Decimal,
    /// What the employee takes home.
    pub net_salary: Decimal,
    /// Gross plus all employer-side contributions.
    pub employer_cost: Decimal,
}

impl PayBreakdown {
    /// Sum of all employee-side contribution amounts.
    pub fn employee_contributions(&self) -> Decimal {
        self.contributions.iter().map(|l| l.employee_amount).sum()
    }

    /// Sum of all employer-side contribution amounts.
    pub fn employer_contributions(&self) -> Decimal {
        self.contributions.iter().map(|l| l.employer_amount).sum()
    }
}

/// The complete result of one payroll calculation attempt.
///
/// Results are immutable: a recalculation while the owning run is in draft
/// produces a *new* result that supersedes this one; once the run is
/// approved the result is frozen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Unique identifier for this calculation attempt.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub computed_at: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// The employee the calculation is for.
    pub employee_id: String,
    /// Country whose rules were applied.
    pub country_code: String,
    /// The period this calculation covers.
    pub period: PayPeriod,
    /// `effective_from` of the configuration version that was applied.
    pub configuration_version: NaiveDate,
    /// Lifecycle state of this attempt.
    pub status: CalculationStatus,
    /// The monetary breakdown.
    pub breakdown: PayBreakdown,
    /// Non-fatal compliance findings.
    pub findings: Vec<Finding>,
    /// Complete audit trail of rule applications.
    pub audit_trace: AuditTrace,
}
