//! Core bookkeeping logic for Choubo.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Rows arrive as plain values (as loaded from the database by the caller) and
//! every computation returns values.
//!
//! # Modules
//!
//! - `accounts` - Chart of accounts and the account tree
//! - `partners` - Customers and suppliers
//! - `ledger` - Journal entries, double-entry validation, running balances
//! - `reports` - Balance sheet, profit & loss, trial balance, cash flow, CSV export
//! - `import` - Bank statement import, mapping rules, duplicate detection
//! - `schema` - Input schemas with per-field validation

pub mod accounts;
pub mod import;
pub mod ledger;
pub mod partners;
pub mod reports;
pub mod schema;
