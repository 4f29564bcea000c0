//! Statutory payroll calculation engine.
//!
//! This crate computes gross pay, mandatory social contributions, progressive
//! income tax, net pay and employer cost for any jurisdiction whose rules are
//! expressed as effective-dated configuration data, together with the
//! supporting compliance checks (minimum wage, leave accrual, special leave
//! allowance).

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod error;
pub mod ledger;
pub mod models;
