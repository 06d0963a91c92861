//! Financial report routes.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::post,
};
use tracing::{error, info};
use choubo_core::reports::{Report, ReportKind, ReportService, export_csv, file_name};
use choubo_shared::{AppError, AppResult};

use super::LedgerSnapshot;
use crate::AppState;
use crate::response::{ActionResponse, CsvResponse, json_body};

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/{kind}", post(generate_report))
        .route("/reports/{kind}/export", post(export_report))
}

fn generate(state: &AppState, kind: &str, snapshot: &LedgerSnapshot) -> AppResult<Report> {
    let kind: ReportKind = kind.parse()?;
    let report = ReportService::generate(
        kind,
        &snapshot.accounts,
        &snapshot.lines(),
        &snapshot.range()?,
        &state.config.ledger.currency,
    )?;
    info!(
        kind = %kind,
        accounts = snapshot.accounts.len(),
        entries = snapshot.entries.len(),
        "Report generated"
    );
    Ok(report)
}

async fn generate_report(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    payload: Result<Json<LedgerSnapshot>, JsonRejection>,
) -> ActionResponse<Report> {
    ActionResponse(json_body(payload).and_then(|snapshot| generate(&state, &kind, &snapshot)))
}

async fn export_report(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    payload: Result<Json<LedgerSnapshot>, JsonRejection>,
) -> CsvResponse {
    let report = json_body(payload).and_then(|snapshot| generate(&state, &kind, &snapshot));
    match report {
        Ok(report) => CsvResponse {
            file_name: file_name(&report),
            body: export_csv(&report).map_err(|e| {
                error!(error = %e, kind = %kind, "Failed to export report");
                AppError::from(e)
            }),
        },
        Err(e) => CsvResponse {
            file_name: format!("{kind}.csv"),
            body: Err(e),
        },
    }
}
