//! Partner routes.

use axum::{Json, Router, extract::{State, rejection::JsonRejection}, routing::post};
use serde::Deserialize;
use tracing::info;
use choubo_core::ledger::{AccountLedger, PartnerAccounts, PartnerBalance, partner_balances, partner_ledger};
use choubo_core::partners::{Partner, PartnerService};
use choubo_core::schema::PartnerInput;
use choubo_shared::types::PartnerId;
use choubo_shared::{AppResult, LedgerConfig};

use super::LedgerSnapshot;
use crate::AppState;
use crate::response::{ActionResponse, json_body};

/// Creates the partner routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/partners/validate", post(validate_partner))
        .route("/partners/balances", post(balances))
        .route("/partners/ledger", post(ledger))
}

/// Request body for validating a new partner.
#[derive(Debug, Deserialize)]
pub struct ValidatePartnerRequest {
    /// The submitted partner.
    pub partner: PartnerInput,
    /// Partners already registered.
    #[serde(default)]
    pub partners: Vec<Partner>,
}

/// Request body for one partner's ledger.
#[derive(Debug, Deserialize)]
pub struct PartnerLedgerRequest {
    /// The partner.
    pub partner_id: PartnerId,
    /// Chart, entries and range.
    #[serde(flatten)]
    pub snapshot: LedgerSnapshot,
}

fn partner_accounts(snapshot: &LedgerSnapshot, config: &LedgerConfig) -> PartnerAccounts {
    PartnerAccounts::resolve(
        &snapshot.accounts,
        &config.receivable_account_codes,
        &config.payable_account_codes,
    )
}

async fn validate_partner(payload: Result<Json<ValidatePartnerRequest>, JsonRejection>) -> ActionResponse<Partner> {
    ActionResponse(json_body(payload).and_then(|request| {
        let partner = PartnerService::prepare_partner(request.partner, &request.partners)?;
        info!(code = %partner.code, "Partner validated");
        Ok(partner)
    }))
}

async fn balances(
    State(state): State<AppState>,
    payload: Result<Json<LedgerSnapshot>, JsonRejection>,
) -> ActionResponse<Vec<PartnerBalance>> {
    ActionResponse(json_body(payload).and_then(|snapshot| -> AppResult<Vec<PartnerBalance>> {
        let accounts = partner_accounts(&snapshot, &state.config.ledger);
        Ok(partner_balances(&snapshot.lines(), &accounts, &snapshot.range()?))
    }))
}

async fn ledger(
    State(state): State<AppState>,
    payload: Result<Json<PartnerLedgerRequest>, JsonRejection>,
) -> ActionResponse<AccountLedger> {
    ActionResponse(json_body(payload).and_then(|request| -> AppResult<AccountLedger> {
        let snapshot = &request.snapshot;
        let accounts = partner_accounts(snapshot, &state.config.ledger);
        Ok(partner_ledger(request.partner_id, &snapshot.lines(), &accounts, &snapshot.range()?)?)
    }))
}
