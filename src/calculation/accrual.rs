//! Leave-accrual rate resolution.
//!
//! Resolves the monthly leave accrual for an employee from the configured
//! rule set: rate overrides (e.g. youth rates) replace the standard monthly
//! rate, bonus-day rules (e.g. seniority) add to it, and the rule set's
//! combination policy decides whether a bonus stacks on top of an override.

use rust_decimal::Decimal;

use crate::config::{AccrualEffect, AccrualRule, AccrualRuleSet, AccrualTrigger, OverrideBonusPolicy};
use crate::models::AuditStep;

/// The resolved monthly accrual for one employee.
#[derive(Debug, Clone)]
pub struct AccrualOutcome {
    /// Monthly accrual in days after all applicable rules.
    pub monthly_days: Decimal,
    /// Id of the rate-override rule applied, if any.
    pub override_rule: Option<String>,
    /// Id of the bonus-days rule applied, if any.
    pub bonus_rule: Option<String>,
    /// Audit step describing the resolution.
    pub audit_step: AuditStep,
}

fn rule_matches(rule: &AccrualRule, age: u32, seniority_years: u32) -> bool {
    match rule.trigger {
        AccrualTrigger::AgeBelow => age < rule.threshold,
        AccrualTrigger::SeniorityAtLeast => seniority_years >= rule.threshold,
    }
}

/// Resolves the monthly accrual rate for an employee.
///
/// Among matching rules of each effect kind, the one with the lowest
/// precedence rank wins; at most one override and one bonus rule apply.
/// When both kinds match, `override_with_bonus` on the rule set decides
/// whether the bonus stacks on the overridden rate or is discarded.
pub fn resolve_accrual_rate(
    rule_set: &AccrualRuleSet,
    age: u32,
    seniority_years: u32,
    step_number: u32,
) -> AccrualOutcome {
    let winning_override = rule_set
        .rules
        .iter()
        .filter(|r| matches!(r.effect, AccrualEffect::MonthlyRateOverride { .. }))
        .filter(|r| rule_matches(r, age, seniority_years))
        .min_by_key(|r| r.precedence);
    let winning_bonus = rule_set
        .rules
        .iter()
        .filter(|r| matches!(r.effect, AccrualEffect::BonusDays { .. }))
        .filter(|r| rule_matches(r, age, seniority_years))
        .min_by_key(|r| r.precedence);

    let mut monthly_days = match winning_override {
        Some(rule) => match rule.effect {
            AccrualEffect::MonthlyRateOverride { days } => days,
            AccrualEffect::BonusDays { .. } => unreachable!("filtered to overrides"),
        },
        None => rule_set.standard_monthly_days,
    };

    let bonus_applies = winning_bonus.is_some()
        && (winning_override.is_none()
            || rule_set.override_with_bonus == OverrideBonusPolicy::Stack);
    let mut applied_bonus = None;
    if bonus_applies {
        if let Some(rule) = winning_bonus
            && let AccrualEffect::BonusDays { days } = rule.effect
        {
            monthly_days += days;
            applied_bonus = Some(rule.id.clone());
        }
    }

    let reasoning = match (winning_override, &applied_bonus) {
        (Some(o), Some(b)) => format!(
            "Rate override '{}' replaces standard {}; bonus '{}' stacks, giving {} days/month",
            o.id, rule_set.standard_monthly_days, b, monthly_days
        ),
        (Some(o), None) if winning_bonus.is_some() => format!(
            "Rate override '{}' replaces standard {}; matching bonus discarded by policy, giving {} days/month",
            o.id, rule_set.standard_monthly_days, monthly_days
        ),
        (Some(o), None) => format!(
            "Rate override '{}' replaces standard {}, giving {} days/month",
            o.id, rule_set.standard_monthly_days, monthly_days
        ),
        (None, Some(b)) => format!(
            "Bonus '{}' adds to standard {}, giving {} days/month",
            b, rule_set.standard_monthly_days, monthly_days
        ),
        (None, None) => format!(
            "No rule matched; standard rate {} days/month applies",
            rule_set.standard_monthly_days
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "accrual_resolution".to_string(),
        rule_name: "Leave accrual rate".to_string(),
        rule_ref: "accrual_rules".to_string(),
        input: serde_json::json!({
            "age": age,
            "seniority_years": seniority_years,
            "standard_monthly_days": rule_set.standard_monthly_days.to_string(),
        }),
        output: serde_json::json!({
            "monthly_days": monthly_days.to_string(),
            "override_rule": winning_override.map(|r| r.id.as_str()),
            "bonus_rule": applied_bonus.as_deref(),
        }),
        reasoning,
    };

    AccrualOutcome {
        monthly_days,
        override_rule: winning_override.map(|r| r.id.clone()),
        bonus_rule: applied_bonus,
        audit_step,
    }
}
