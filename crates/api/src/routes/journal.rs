//! Journal entry routes.

use axum::{Json, Router, extract::rejection::JsonRejection, routing::post};
use serde::{Deserialize, Serialize};
use tracing::info;
use choubo_core::accounts::Account;
use choubo_core::ledger::{EntryStatus, EntryTotals, JournalEntry, LedgerService, PeriodLock};
use choubo_core::schema::JournalEntryInput;
use choubo_shared::AppResult;

use crate::AppState;
use crate::response::{ActionResponse, json_body};

/// Creates the journal entry routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/journal-entries/validate", post(validate_entry))
        .route("/journal-entries/revise", post(revise_entry))
        .route("/journal-entries/delete-check", post(check_delete))
        .route("/journal-entries/transition", post(transition_entry))
}

/// Request body for validating a new entry.
#[derive(Debug, Deserialize)]
pub struct ValidateEntryRequest {
    /// The submitted entry.
    pub entry: JournalEntryInput,
    /// Chart of accounts the lines must reference.
    #[serde(default)]
    pub accounts: Vec<Account>,
    /// Current closing lock.
    #[serde(default)]
    pub period_lock: PeriodLock,
}

/// Request body for revising a stored entry.
#[derive(Debug, Deserialize)]
pub struct ReviseEntryRequest {
    /// The entry as stored.
    pub existing: JournalEntry,
    /// The replacement values.
    pub entry: JournalEntryInput,
    /// Chart of accounts the lines must reference.
    #[serde(default)]
    pub accounts: Vec<Account>,
    /// Current closing lock.
    #[serde(default)]
    pub period_lock: PeriodLock,
}

/// Request body for checking whether an entry may be deleted.
#[derive(Debug, Deserialize)]
pub struct DeleteCheckRequest {
    /// The stored entry.
    pub entry: JournalEntry,
    /// Current closing lock.
    #[serde(default)]
    pub period_lock: PeriodLock,
}

/// Request body for a status change.
#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    /// The stored entry.
    pub entry: JournalEntry,
    /// Target status.
    pub to: EntryStatus,
    /// Current closing lock.
    #[serde(default)]
    pub period_lock: PeriodLock,
}

/// A validated entry ready to be stored.
#[derive(Debug, Serialize)]
pub struct PreparedEntry {
    /// The entry.
    pub entry: JournalEntry,
    /// Its debit and credit totals.
    pub totals: EntryTotals,
}

/// Whether an entry may be deleted.
#[derive(Debug, Serialize)]
pub struct DeleteCheck {
    /// Always true; refusals come back as errors.
    pub deletable: bool,
}

async fn validate_entry(
    payload: Result<Json<ValidateEntryRequest>, JsonRejection>,
) -> ActionResponse<PreparedEntry> {
    ActionResponse(json_body(payload).and_then(|request| {
        let (entry, totals) =
            LedgerService::prepare_entry(request.entry, &request.accounts, &request.period_lock)?;
        info!(entry_id = %entry.id, lines = entry.lines.len(), "Journal entry validated");
        Ok(PreparedEntry { entry, totals })
    }))
}

async fn revise_entry(payload: Result<Json<ReviseEntryRequest>, JsonRejection>) -> ActionResponse<PreparedEntry> {
    ActionResponse(json_body(payload).and_then(|request| {
        let (entry, totals) = LedgerService::revise_entry(
            &request.existing,
            request.entry,
            &request.accounts,
            &request.period_lock,
        )?;
        info!(entry_id = %entry.id, "Journal entry revised");
        Ok(PreparedEntry { entry, totals })
    }))
}

async fn check_delete(payload: Result<Json<DeleteCheckRequest>, JsonRejection>) -> ActionResponse<DeleteCheck> {
    ActionResponse(json_body(payload).and_then(|request| {
        LedgerService::ensure_deletable(&request.entry, &request.period_lock)?;
        Ok(DeleteCheck { deletable: true })
    }))
}

async fn transition_entry(payload: Result<Json<TransitionRequest>, JsonRejection>) -> ActionResponse<JournalEntry> {
    ActionResponse(json_body(payload).and_then(|request| -> AppResult<JournalEntry> {
        let from = request.entry.status;
        let entry = LedgerService::change_status(request.entry, request.to, &request.period_lock)?;
        info!(entry_id = %entry.id, ?from, to = ?entry.status, "Journal entry status changed");
        Ok(entry)
    }))
}
