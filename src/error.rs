//! Error types for the payroll calculation engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during payroll calculation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// The main error type for the payroll calculation engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application. Non-fatal
/// compliance findings (minimum-wage violations, unmapped categories) are
/// *not* errors; they travel inside the calculation result.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
/// use chrono::NaiveDate;
///
/// let error = EngineError::ConfigurationNotFound {
///     country: "civ".to_string(),
///     date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "No configuration for country 'civ' effective on 2024-01-01"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// No country configuration version covers the calculation date.
    ///
    /// The engine never falls back to a default or most-recent configuration.
    #[error("No configuration for country '{country}' effective on {date}")]
    ConfigurationNotFound {
        /// The requested country code.
        country: String,
        /// The calculation date for which resolution was attempted.
        date: NaiveDate,
    },

    /// More than one configuration version covers the calculation date.
    ///
    /// This indicates overlapping effective ranges in the stored data; the
    /// engine refuses to guess which version applies.
    #[error("{matching} configurations for country '{country}' overlap on {date}")]
    ConfigurationAmbiguous {
        /// The requested country code.
        country: String,
        /// The calculation date for which resolution was attempted.
        date: NaiveDate,
        /// How many versions matched.
        matching: usize,
    },

    /// Configuration file or directory was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A loaded configuration violated a structural invariant.
    #[error("Invalid configuration for country '{country}': {message}")]
    InvalidConfiguration {
        /// The country code of the offending configuration.
        country: String,
        /// A description of the violated invariant.
        message: String,
    },

    /// Fiscal parts (family quotient divisor) must be strictly positive.
    #[error("Invalid fiscal parts: {value} (must be positive)")]
    InvalidFiscalParts {
        /// The rejected value.
        value: Decimal,
    },

    /// Base salary input was rejected.
    #[error("Invalid base salary {value}: {message}")]
    InvalidBaseSalary {
        /// The rejected value.
        value: Decimal,
        /// A description of what made the value invalid.
        message: String,
    },

    /// The reference wage window for a special leave allowance was empty.
    #[error("Insufficient wage history for employee '{employee_id}' at {payment_date}")]
    InsufficientHistory {
        /// The employee the allowance was requested for.
        employee_id: String,
        /// The intended payment date.
        payment_date: NaiveDate,
    },

    /// A special leave allowance was already paid for this employee and run.
    #[error("Leave allowance already recorded for employee '{employee_id}' in run {run_id}")]
    DuplicateAllowancePayment {
        /// The employee the duplicate was attempted for.
        employee_id: String,
        /// The payroll run the existing record belongs to.
        run_id: Uuid,
    },

    /// A write was attempted against an approved (read-only) payroll run.
    #[error("Payroll run {run_id} is approved and no longer mutable")]
    RunNotMutable {
        /// The approved run.
        run_id: Uuid,
    },

    /// The referenced payroll run does not exist in the ledger.
    #[error("Unknown payroll run: {run_id}")]
    RunNotFound {
        /// The missing run id.
        run_id: Uuid,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
