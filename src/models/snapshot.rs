//! Employee compensation input models.
//!
//! This module contains the [`EmployeeCompensationSnapshot`] read-only input
//! and the [`PayPeriod`] it is calculated for. The snapshot is owned by the
//! surrounding application layer, not by the engine.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The period a payroll calculation covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPeriod {
    /// The start date of the period (inclusive).
    pub start_date: NaiveDate,
    /// The end date of the period (inclusive).
    pub end_date: NaiveDate,
}

impl PayPeriod {
    /// Checks if a given date falls within this period.
    ///
    /// The check is inclusive of both start and end dates.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::PayPeriod;
    /// use chrono::NaiveDate;
    ///
    /// let period = PayPeriod {
    ///     start_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
    ///     end_date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
    /// };
    ///
    /// assert!(period.contains_date(NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()));
    /// assert!(!period.contains_date(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()));
    /// ```
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

/// One named allowance included in an employee's gross pay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceInput {
    /// The allowance name (e.g. "housing", "responsibility").
    pub name: String,
    /// The monthly amount.
    pub amount: Decimal,
}

/// Read-only compensation inputs for one employee and period.
///
/// Everything the calculators need is carried here explicitly; the engine
/// never reads ambient "current law" or "current employee" state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeCompensationSnapshot {
    /// Unique identifier for the employee.
    pub employee_id: String,
    /// Country whose statutory rules apply.
    pub country_code: String,
    /// The period this calculation covers.
    pub period: PayPeriod,
    /// The date used to resolve the effective configuration version.
    pub calculation_date: NaiveDate,
    /// Contractual monthly base salary.
    pub base_salary: Decimal,
    /// Named allowances added to gross pay.
    #[serde(default)]
    pub allowances: Vec<AllowanceInput>,
    /// Overtime pay for the period, if any.
    #[serde(default)]
    pub overtime: Option<Decimal>,
    /// One-off bonus for the period, if any.
    #[serde(default)]
    pub bonus: Option<Decimal>,
    /// Family quotient divisor for income tax (strictly positive).
    pub fiscal_parts: Decimal,
    /// The employee's age in years at the calculation date.
    pub age: u32,
    /// Completed years of seniority at the calculation date.
    pub seniority_years: u32,
    /// Job category or coefficient code for minimum-wage lookup.
    pub category: String,
    /// Sector code for minimum-wage lookup.
    pub sector_code: String,
    /// Work city for the transport-allowance table, if known.
    #[serde(default)]
    pub city: Option<String>,
}

impl EmployeeCompensationSnapshot {
    /// Sums the salary components the employee brings to the calculation:
    /// base salary, named allowances, overtime and bonus.
    ///
    /// City transport allowances come from configuration and are added by the
    /// orchestrator, not here.
    pub fn compensation_total(&self) -> Decimal {
        let allowances: Decimal = self.allowances.iter().map(|a| a.amount).sum();
        self.base_salary
            + allowances
            + self.overtime.unwrap_or(Decimal::ZERO)
            + self.bonus.unwrap_or(Decimal::ZERO)
    }
}
