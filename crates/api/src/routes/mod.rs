//! API route definitions.
//!
//! Every action is a POST carrying the rows it works on; nothing is read
//! from storage here.

use axum::Router;
use chrono::NaiveDate;
use serde::Deserialize;
use choubo_core::accounts::Account;
use choubo_core::ledger::{DateRange, JournalEntry, LedgerLine, ledger_lines};
use choubo_shared::AppResult;

use crate::AppState;

pub mod accounts;
pub mod health;
pub mod import;
pub mod journal;
pub mod ledger;
pub mod partners;
pub mod reports;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(journal::routes())
        .merge(ledger::routes())
        .merge(accounts::routes())
        .merge(partners::routes())
        .merge(reports::routes())
        .merge(import::routes())
}

/// The chart and entries a read-only action works on.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LedgerSnapshot {
    /// Chart of accounts.
    #[serde(default)]
    pub accounts: Vec<Account>,
    /// Journal entries.
    #[serde(default)]
    pub entries: Vec<JournalEntry>,
    /// Start date (inclusive).
    #[serde(default)]
    pub from: Option<NaiveDate>,
    /// End date (inclusive).
    #[serde(default)]
    pub to: Option<NaiveDate>,
    /// Count draft entries too.
    #[serde(default)]
    pub include_drafts: bool,
}

impl LedgerSnapshot {
    /// Returns the validated date range.
    pub fn range(&self) -> AppResult<DateRange> {
        Ok(DateRange::new(self.from, self.to)?)
    }

    /// Flattens the entries into ledger lines.
    pub fn lines(&self) -> Vec<LedgerLine> {
        ledger_lines(&self.entries, self.include_drafts)
    }
}
