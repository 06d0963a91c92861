//! Double-entry bookkeeping logic.
//!
//! This module implements the core ledger functionality:
//! - Journal entries and their lines
//! - Double-entry validation
//! - Running balances and account balances
//! - Partner receivable / payable balances
//! - Entry status lifecycle and period locks
//! - Ledger service for entry preparation

pub mod balance;
pub mod entry;
pub mod error;
pub mod lifecycle;
pub mod partner;
pub mod service;
pub mod validation;

#[cfg(test)]
mod service_props;
#[cfg(test)]
mod validation_props;

pub use balance::{
    AccountBalance, AccountLedger, DateRange, LedgerRow, NormalBalance, RunningBalance, account_balances,
    account_ledger, running_balance,
};
pub use entry::{EntryStatus, JournalEntry, JournalLine, LedgerLine, ledger_lines};
pub use error::LedgerError;
pub use lifecycle::{PeriodLock, ensure_editable, transition};
pub use partner::{PartnerAccounts, PartnerBalance, partner_balance, partner_balances, partner_ledger};
pub use service::LedgerService;
pub use validation::{EntryTotals, check_lines, validate_lines};
