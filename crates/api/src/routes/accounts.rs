//! Chart of accounts routes.

use axum::{Json, Router, extract::rejection::JsonRejection, routing::post};
use serde::Deserialize;
use tracing::info;
use choubo_core::accounts::{Account, AccountNode, AccountService};
use choubo_core::schema::AccountInput;
use choubo_shared::types::AccountId;
use choubo_shared::AppResult;

use super::LedgerSnapshot;
use crate::AppState;
use crate::response::{ActionResponse, json_body};

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts/validate", post(validate_account))
        .route("/accounts/reparent", post(reparent_account))
        .route("/accounts/hierarchy", post(hierarchy))
}

/// Request body for validating a new account.
#[derive(Debug, Deserialize)]
pub struct ValidateAccountRequest {
    /// The submitted account.
    pub account: AccountInput,
    /// Accounts already in the chart.
    #[serde(default)]
    pub accounts: Vec<Account>,
}

/// Request body for moving an account.
#[derive(Debug, Deserialize)]
pub struct ReparentRequest {
    /// The chart of accounts.
    pub accounts: Vec<Account>,
    /// The account to move.
    pub account_id: AccountId,
    /// Its new parent; `null` makes it a root.
    #[serde(default)]
    pub parent_id: Option<AccountId>,
}

async fn validate_account(payload: Result<Json<ValidateAccountRequest>, JsonRejection>) -> ActionResponse<Account> {
    ActionResponse(json_body(payload).and_then(|request| {
        let account = AccountService::prepare_account(request.account, &request.accounts)?;
        info!(code = %account.code, "Account validated");
        Ok(account)
    }))
}

async fn reparent_account(payload: Result<Json<ReparentRequest>, JsonRejection>) -> ActionResponse<Vec<Account>> {
    ActionResponse(
        json_body(payload)
            .and_then(|request| AccountService::reparent(&request.accounts, request.account_id, request.parent_id)),
    )
}

async fn hierarchy(payload: Result<Json<LedgerSnapshot>, JsonRejection>) -> ActionResponse<Vec<AccountNode>> {
    ActionResponse(json_body(payload).and_then(|snapshot| -> AppResult<Vec<AccountNode>> {
        AccountService::hierarchy(&snapshot.accounts, &snapshot.lines(), &snapshot.range()?)
    }))
}
