//! Progressive income-tax calculation with family-quotient splitting.
//!
//! The taxable income is divided by the household's fiscal parts, the marginal
//! bracket schedule is applied to the quotient, and the resulting tax is
//! multiplied back by the parts. No intermediate rounding is applied, so the
//! tax function stays continuous across bracket boundaries.

use rust_decimal::Decimal;

use crate::config::TaxBracket;
use crate::error::{EngineError, EngineResult};
use crate::models::AuditStep;

/// One bracket's share of the tax on the quotient.
#[derive(Debug, Clone)]
pub struct BracketLine {
    /// Lower bound of the bracket slice.
    pub lower: Decimal,
    /// Upper bound of the slice, `None` for the open-ended top bracket.
    pub upper: Option<Decimal>,
    /// Marginal rate applied to the slice.
    pub rate: Decimal,
    /// Portion of the quotient falling inside this bracket.
    pub taxed_amount: Decimal,
    /// Tax on that portion, before re-multiplying by fiscal parts.
    pub tax: Decimal,
}

/// The result of the income-tax calculation.
#[derive(Debug, Clone)]
pub struct IncomeTaxOutcome {
    /// Taxable income after clamping negatives to zero.
    pub taxable_income: Decimal,
    /// Quotient the bracket schedule was applied to.
    pub quotient: Decimal,
    /// Per-bracket slices, only those actually touched by the quotient.
    pub bracket_lines: Vec<BracketLine>,
    /// Final tax, `tax(quotient) × fiscal_parts`, unrounded.
    pub tax: Decimal,
    /// Audit step describing the whole computation.
    pub audit_step: AuditStep,
}

/// Computes the progressive income tax on a taxable income.
///
/// A negative taxable income (deductions exceeding gross) is clamped to zero
/// rather than producing a negative tax.
///
/// # Arguments
///
/// * `brackets` - The contiguous marginal brackets from the configuration
/// * `taxable_income` - Gross minus the tax-base-reducing contributions
/// * `fiscal_parts` - The family quotient divisor (strictly positive)
/// * `step_number` - The step number for audit trail sequencing
///
/// # Errors
///
/// `InvalidFiscalParts` when `fiscal_parts` is zero or negative.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_income_tax;
/// use payroll_engine::config::TaxBracket;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let brackets = vec![
///     TaxBracket {
///         lower: Decimal::ZERO,
///         upper: Some(Decimal::from(75_000)),
///         rate: Decimal::ZERO,
///     },
///     TaxBracket {
///         lower: Decimal::from(75_000),
///         upper: None,
///         rate: Decimal::from_str("0.16").unwrap(),
///     },
/// ];
///
/// let outcome = calculate_income_tax(
///     &brackets,
///     Decimal::from(167_660),
///     Decimal::ONE,
///     1,
/// ).unwrap();
/// assert_eq!(outcome.tax, Decimal::from_str("14825.60").unwrap());
/// ```
pub fn calculate_income_tax(
    brackets: &[TaxBracket],
    taxable_income: Decimal,
    fiscal_parts: Decimal,
    step_number: u32,
) -> EngineResult<IncomeTaxOutcome> {
    if fiscal_parts <= Decimal::ZERO {
        return Err(EngineError::InvalidFiscalParts {
            value: fiscal_parts,
        });
    }

    let taxable_income = taxable_income.max(Decimal::ZERO);
    let quotient = taxable_income / fiscal_parts;

    let mut bracket_lines = Vec::new();
    let mut tax_on_quotient = Decimal::ZERO;

    for bracket in brackets {
        if quotient <= bracket.lower {
            break;
        }
        let slice_top = match bracket.upper {
            Some(upper) => quotient.min(upper),
            None => quotient,
        };
        let taxed_amount = slice_top - bracket.lower;
        let tax = taxed_amount * bracket.rate;
        tax_on_quotient += tax;
        bracket_lines.push(BracketLine {
            lower: bracket.lower,
            upper: bracket.upper,
            rate: bracket.rate,
            taxed_amount,
            tax,
        });
    }

    let tax = tax_on_quotient * fiscal_parts;

    let audit_step = AuditStep {
        step_number,
        rule_id: "income_tax".to_string(),
        rule_name: "Progressive income tax".to_string(),
        rule_ref: "tax_brackets".to_string(),
        input: serde_json::json!({
            "taxable_income": taxable_income.to_string(),
            "fiscal_parts": fiscal_parts.to_string(),
        }),
        output: serde_json::json!({
            "quotient": quotient.to_string(),
            "tax_on_quotient": tax_on_quotient.to_string(),
            "tax": tax.to_string(),
            "brackets_applied": bracket_lines.len(),
        }),
        reasoning: format!(
            "Quotient {} / {} = {}; marginal schedule over {} bracket(s) gives {} per part, × {} parts = {}",
            taxable_income,
            fiscal_parts,
            quotient,
            bracket_lines.len(),
            tax_on_quotient,
            fiscal_parts,
            tax
        ),
    };

    Ok(IncomeTaxOutcome {
        taxable_income,
        quotient,
        bracket_lines,
        tax,
        audit_step,
    })
}
