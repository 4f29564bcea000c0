//! Configuration loading and resolution for the payroll engine.
//!
//! Each jurisdiction's statutory rules are pure data: an effective-dated
//! [`CountryConfiguration`] holding contribution schemes, tax brackets,
//! minimum-wage tables and accrual rules. Adding a jurisdiction means adding
//! configuration files, not code paths.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigResolver;
//! use chrono::NaiveDate;
//!
//! let resolver = ConfigResolver::load("./config").unwrap();
//! let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
//! let config = resolver.resolve("civ", date).unwrap();
//! println!("Resolved version effective from {}", config.effective_from);
//! ```

mod resolver;
mod types;

pub use resolver::ConfigResolver;
pub use types::{
    AccrualEffect, AccrualRule, AccrualRuleSet, AccrualTrigger, ContributionScheme,
    CountryConfiguration, LeaveAllowancePolicy, MinimumWageEntry, MinimumWageTable,
    OverrideBonusPolicy, RoundingPolicy, SchemeBasis, TaxBracket, TransportAllowanceTable,
};
