//! Bank statement import routes.

use axum::{Json, Router, extract::{State, rejection::JsonRejection}, routing::post};
use serde::Deserialize;
use tracing::info;
use validator::Validate;
use choubo_core::import::{ImportPreview, ImportService, MappingRule, existing_transactions};
use choubo_core::ledger::JournalEntry;
use choubo_core::schema::MappingRuleInput;
use choubo_shared::AppResult;

use crate::AppState;
use crate::response::{ActionResponse, json_body};

/// Creates the import routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/import/analyze", post(analyze))
}

/// Request body for analyzing a statement.
#[derive(Debug, Deserialize, Validate)]
pub struct AnalyzeRequest {
    /// Statement CSV text.
    pub csv: String,
    /// Mapping rules to apply.
    #[serde(default)]
    #[validate(nested)]
    pub rules: Vec<MappingRuleInput>,
    /// Entries already booked, for duplicate detection.
    #[serde(default)]
    pub entries: Vec<JournalEntry>,
}

async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> ActionResponse<ImportPreview> {
    ActionResponse(json_body(payload).and_then(|request| -> AppResult<ImportPreview> {
        request.validate()?;
        let rules: Vec<MappingRule> = request.rules.into_iter().map(MappingRule::from).collect();
        let existing = existing_transactions(&request.entries);
        let preview = ImportService::analyze(&request.csv, &rules, &existing, &state.config.import)?;
        info!(
            total = preview.summary.total,
            to_import = preview.summary.to_import,
            to_review = preview.summary.to_review,
            to_skip = preview.summary.to_skip,
            errors = preview.summary.errors,
            "Statement analyzed"
        );
        Ok(preview)
    }))
}
