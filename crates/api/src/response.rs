//! Response envelope for actions.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{debug, error};
use choubo_shared::{ActionResult, AppError, AppResult, ErrorCategory};

/// An action outcome rendered as `{"success": ..}` JSON.
///
/// Failures carry the status code of their error category.
#[derive(Debug)]
pub struct ActionResponse<T>(pub AppResult<T>);

impl<T> From<AppResult<T>> for ActionResponse<T> {
    fn from(result: AppResult<T>) -> Self {
        Self(result)
    }
}

impl<T: Serialize> IntoResponse for ActionResponse<T> {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Ok(_) => StatusCode::OK,
            Err(error) => {
                log_failure(error);
                status_of(error)
            }
        };
        (status, Json(ActionResult::from(self.0))).into_response()
    }
}

/// A CSV download, or the JSON failure envelope.
#[derive(Debug)]
pub struct CsvResponse {
    /// Download file name.
    pub file_name: String,
    /// CSV text.
    pub body: AppResult<String>,
}

impl IntoResponse for CsvResponse {
    fn into_response(self) -> Response {
        match self.body {
            Ok(body) => (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", self.file_name),
                    ),
                ],
                body,
            )
                .into_response(),
            Err(error) => ActionResponse::<()>(Err(error)).into_response(),
        }
    }
}

/// Unwraps a JSON body, turning a rejection into a `body` field error.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        debug!(error = %rejection.body_text(), "Rejected request body");
        AppError::field("body", "The request body is not valid JSON for this action")
    })
}

fn status_of(error: &AppError) -> StatusCode {
    StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

fn log_failure(error: &AppError) {
    match error.category() {
        ErrorCategory::ServerError | ErrorCategory::Database | ErrorCategory::Network => {
            error!(error = %error, "Action failed");
        }
        category => debug!(category = category.as_str(), error = %error, "Action rejected"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_success_envelope() {
        let response = ActionResponse(Ok(42)).into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json, serde_json::json!({"success": true, "data": 42}));
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let response =
            ActionResponse::<()>(Err(AppError::Internal("db at 10.0.0.3 timed out".into()))).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "server_error");
        assert!(!json["error"]["message"].as_str().unwrap().contains("10.0.0.3"));
    }

    #[tokio::test]
    async fn test_csv_response_headers() {
        let response = CsvResponse {
            file_name: "trial-balance.csv".into(),
            body: Ok("code,name\n".into()),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/csv; charset=utf-8"
        );
        assert!(response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains("trial-balance.csv"));
    }
}
