//! Configuration types for statutory payroll rules.
//!
//! This module contains the strongly-typed, effective-dated rule set that
//! is deserialized from YAML configuration files. A configuration version is
//! immutable once loaded; a law change produces a new version with a later
//! effective-from date, never an in-place edit.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{EngineError, EngineResult};

/// Rounding policy for a contribution amount, declared per scheme.
///
/// Amounts are held in whole minor currency units, so each policy rounds to
/// zero decimal places.
///
/// # Example
///
/// ```
/// use payroll_engine::config::RoundingPolicy;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let amount = Decimal::from_str("11340.5").unwrap();
/// assert_eq!(RoundingPolicy::HalfUp.apply(amount), Decimal::from(11341));
/// assert_eq!(RoundingPolicy::Down.apply(amount), Decimal::from(11340));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingPolicy {
    /// Round halves away from zero (the usual statutory default).
    #[default]
    HalfUp,
    /// Always round toward negative infinity.
    Down,
    /// Always round toward positive infinity.
    Up,
}

impl RoundingPolicy {
    /// Applies this policy to an amount, producing a whole-unit value.
    pub fn apply(&self, amount: Decimal) -> Decimal {
        let strategy = match self {
            RoundingPolicy::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            RoundingPolicy::Down => RoundingStrategy::ToNegativeInfinity,
            RoundingPolicy::Up => RoundingStrategy::ToPositiveInfinity,
        };
        amount.round_dp_with_strategy(0, strategy)
    }
}

/// How a contribution scheme derives its amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SchemeBasis {
    /// Percentage of the (clamped) contribution base.
    Rated {
        /// Rate withheld from the employee.
        employee_rate: Decimal,
        /// Rate borne by the employer.
        employer_rate: Decimal,
    },
    /// Fixed sum per period, independent of salary.
    Flat {
        /// Amount withheld from the employee.
        employee_amount: Decimal,
        /// Amount borne by the employer.
        #[serde(default)]
        employer_amount: Decimal,
    },
}

/// One named social-insurance program with its own rates and base bounds.
///
/// The effective contribution base is always
/// `clamp(gross, base_floor ?? 0, base_ceiling ?? +inf)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionScheme {
    /// Stable identifier (e.g. "cnps_pension").
    pub code: String,
    /// Human-readable name of the scheme.
    pub name: String,
    /// Rated or flat amount derivation.
    pub basis: SchemeBasis,
    /// Minimum contribution base, if the scheme declares one.
    #[serde(default)]
    pub base_floor: Option<Decimal>,
    /// Maximum contribution base, if the scheme declares one.
    #[serde(default)]
    pub base_ceiling: Option<Decimal>,
    /// Rounding policy for the computed amounts.
    #[serde(default)]
    pub rounding: RoundingPolicy,
    /// Whether the employee amount reduces the income-tax base.
    #[serde(default = "default_true")]
    pub reduces_tax_base: bool,
}

fn default_true() -> bool {
    true
}

/// One marginal income-tax bracket.
///
/// The rate applies only to the slice of the quotient lying within
/// `[lower, upper)`; the top bracket leaves `upper` unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Inclusive lower bound of the bracket.
    pub lower: Decimal,
    /// Exclusive upper bound; `None` for the open-ended top bracket.
    #[serde(default)]
    pub upper: Option<Decimal>,
    /// Marginal rate for income within the bracket.
    pub rate: Decimal,
}

/// A minimum-wage floor for one category/sector combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimumWageEntry {
    /// Job category or coefficient code (e.g. "A1").
    pub category: String,
    /// Sector code (e.g. "general", "agriculture").
    pub sector_code: String,
    /// Monthly minimum base salary for this combination.
    pub monthly_minimum: Decimal,
}

/// Per-category/sector minimum-wage table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimumWageTable {
    /// The table entries, one per (category, sector) pair.
    #[serde(default)]
    pub entries: Vec<MinimumWageEntry>,
}

impl MinimumWageTable {
    /// Looks up the monthly minimum for a category/sector pair.
    ///
    /// Returns `None` when the combination is unmapped; callers must treat
    /// that as a warning, never as compliance.
    pub fn lookup(&self, category: &str, sector: &str) -> Option<Decimal> {
        self.entries
            .iter()
            .find(|e| e.category == category && e.sector_code == sector)
            .map(|e| e.monthly_minimum)
    }
}

/// Monthly transport allowance amounts keyed by city.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportAllowanceTable {
    /// City code to monthly allowance amount.
    #[serde(default)]
    pub entries: HashMap<String, Decimal>,
}

impl TransportAllowanceTable {
    /// Returns the monthly allowance for a city, if one is configured.
    pub fn for_city(&self, city: &str) -> Option<Decimal> {
        self.entries.get(city).copied()
    }
}

/// Condition under which an accrual rule triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccrualTrigger {
    /// Matches employees strictly younger than the threshold.
    AgeBelow,
    /// Matches employees with at least the threshold years of seniority.
    SeniorityAtLeast,
}

/// Effect an accrual rule has on the monthly leave entitlement.
///
/// Rate overrides and day bonuses are distinct rule kinds: a youth rule
/// replaces the standard monthly rate, a seniority rule adds bonus days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccrualEffect {
    /// Replaces the standard monthly accrual rate.
    MonthlyRateOverride {
        /// The replacement rate in days per month.
        days: Decimal,
    },
    /// Adds bonus days on top of the monthly accrual.
    BonusDays {
        /// The bonus in days added to the monthly accrual.
        days: Decimal,
    },
}

/// One age- or seniority-triggered adjustment to the leave accrual rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccrualRule {
    /// Stable identifier (e.g. "youth_rate", "seniority_15").
    pub id: String,
    /// The trigger condition kind.
    pub trigger: AccrualTrigger,
    /// The threshold the trigger compares against (years).
    pub threshold: u32,
    /// What the rule does when it matches.
    pub effect: AccrualEffect,
    /// Precedence rank among matching rules of the same effect kind;
    /// lower rank wins.
    pub precedence: u32,
}

/// Policy for combining a rate override with a simultaneous day bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideBonusPolicy {
    /// The override rate applies and any bonus is discarded.
    OverrideOnly,
    /// The override rate applies and bonus days stack on top.
    Stack,
}

/// The complete leave-accrual rule set for a country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccrualRuleSet {
    /// The standard monthly accrual rate in days.
    pub standard_monthly_days: Decimal,
    /// How a rate override combines with a simultaneous bonus. This is an
    /// explicit configuration field, never an engine assumption.
    pub override_with_bonus: OverrideBonusPolicy,
    /// Zero or more age/seniority rules.
    #[serde(default)]
    pub rules: Vec<AccrualRule>,
}

/// Averaging policy for the special leave allowance reference wage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveAllowancePolicy {
    /// Length of the trailing reference window in months.
    pub reference_months: u32,
    /// Divisor converting an average monthly wage to a daily wage.
    pub days_per_month: Decimal,
}

/// The complete effective-dated rule set for one country.
///
/// Versions for the same country must never overlap; the resolver fails with
/// an ambiguity error if they do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryConfiguration {
    /// ISO-style country code (e.g. "civ", "sen").
    pub country_code: String,
    /// First date (inclusive) on which this version applies.
    pub effective_from: NaiveDate,
    /// Last date (inclusive) on which this version applies; `None` while the
    /// version is current.
    #[serde(default)]
    pub effective_to: Option<NaiveDate>,
    /// Ordered list of social-contribution schemes.
    pub contribution_schemes: Vec<ContributionScheme>,
    /// Ordered, contiguous progressive tax brackets.
    pub tax_brackets: Vec<TaxBracket>,
    /// Per-category/sector minimum wages.
    #[serde(default)]
    pub minimum_wages: MinimumWageTable,
    /// Transport allowance amounts by city.
    #[serde(default)]
    pub transport_allowances: TransportAllowanceTable,
    /// Leave-accrual rules.
    pub accrual: AccrualRuleSet,
    /// Special leave allowance averaging policy.
    pub leave_allowance: LeaveAllowancePolicy,
}

impl CountryConfiguration {
    /// Returns true when this version covers the given date.
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        self.effective_from <= date && self.effective_to.is_none_or(|to| to >= date)
    }

    /// Validates the structural invariants of this configuration.
    ///
    /// Checks that tax brackets are sorted ascending, contiguous and only
    /// open-ended at the top; that rates lie in `[0, 1]`; that scheme floors
    /// do not exceed ceilings; and that the leave-allowance divisor is
    /// strictly positive.
    pub fn validate(&self) -> EngineResult<()> {
        if self.tax_brackets.is_empty() {
            return self.invalid("no tax brackets defined");
        }
        for (i, bracket) in self.tax_brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
                return self.invalid(format!(
                    "tax bracket {} has rate {} outside [0, 1]",
                    i, bracket.rate
                ));
            }
            match bracket.upper {
                Some(upper) if upper <= bracket.lower => {
                    return self.invalid(format!(
                        "tax bracket {} has upper bound {} not above lower bound {}",
                        i, upper, bracket.lower
                    ));
                }
                None if i + 1 != self.tax_brackets.len() => {
                    return self.invalid(format!(
                        "tax bracket {} is open-ended but not the top bracket",
                        i
                    ));
                }
                _ => {}
            }
            if i > 0 {
                let previous = &self.tax_brackets[i - 1];
                if previous.upper != Some(bracket.lower) {
                    return self.invalid(format!(
                        "tax brackets {} and {} are not contiguous",
                        i - 1,
                        i
                    ));
                }
            }
        }

        for scheme in &self.contribution_schemes {
            if let SchemeBasis::Rated {
                employee_rate,
                employer_rate,
            } = &scheme.basis
            {
                for rate in [employee_rate, employer_rate] {
                    if *rate < Decimal::ZERO || *rate > Decimal::ONE {
                        return self.invalid(format!(
                            "scheme '{}' has rate {} outside [0, 1]",
                            scheme.code, rate
                        ));
                    }
                }
            }
            if let (Some(floor), Some(ceiling)) = (scheme.base_floor, scheme.base_ceiling)
                && floor > ceiling
            {
                return self.invalid(format!(
                    "scheme '{}' has floor {} above ceiling {}",
                    scheme.code, floor, ceiling
                ));
            }
        }

        if let Some(to) = self.effective_to
            && to < self.effective_from
        {
            return self.invalid("effective_to precedes effective_from");
        }

        if self.leave_allowance.days_per_month <= Decimal::ZERO {
            return self.invalid("leave allowance days_per_month must be positive");
        }
        if self.leave_allowance.reference_months == 0 {
            return self.invalid("leave allowance reference_months must be at least 1");
        }

        Ok(())
    }

    fn invalid(&self, message: impl Into<String>) -> EngineResult<()> {
        Err(EngineError::InvalidConfiguration {
            country: self.country_code.clone(),
            message: message.into(),
        })
    }
}
