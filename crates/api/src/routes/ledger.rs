//! Account ledger routes.

use axum::{Json, Router, extract::rejection::JsonRejection, routing::post};
use serde::Deserialize;
use choubo_core::ledger::{AccountLedger, account_ledger};
use choubo_shared::types::AccountId;
use choubo_shared::{AppError, AppResult};

use super::LedgerSnapshot;
use crate::AppState;
use crate::response::{ActionResponse, json_body};

/// Creates the ledger routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/ledger/running-balance", post(running_balance))
}

/// Request body for an account's running balance.
#[derive(Debug, Deserialize)]
pub struct RunningBalanceRequest {
    /// The account to list.
    pub account_id: AccountId,
    /// Chart, entries and range.
    #[serde(flatten)]
    pub snapshot: LedgerSnapshot,
}

async fn running_balance(payload: Result<Json<RunningBalanceRequest>, JsonRejection>) -> ActionResponse<AccountLedger> {
    ActionResponse(json_body(payload).and_then(|request| -> AppResult<AccountLedger> {
        let snapshot = &request.snapshot;
        let account = snapshot
            .accounts
            .iter()
            .find(|a| a.id == request.account_id)
            .ok_or_else(|| AppError::NotFound(format!("account {}", request.account_id)))?;
        Ok(account_ledger(account, &snapshot.lines(), &snapshot.range()?)?)
    }))
}
