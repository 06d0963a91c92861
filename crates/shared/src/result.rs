//! Tagged result type returned by every action.
//!
//! Serializes as `{"success": true, "data": ...}` or
//! `{"success": false, "error": {"code": ..., "message": ...}}`.

use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde::Deserialize;

use crate::error::{AppError, AppResult, ErrorCategory, FieldErrors};

/// Error payload of a failed action.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, Deserialize)]
pub struct ActionError {
    /// Error category code (`validation`, `not_found`, ...).
    pub code: String,
    /// User-facing message.
    pub message: String,
    /// Per-field validation messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

impl ActionError {
    /// Builds an action error for a category with its generic message.
    #[must_use]
    pub fn from_category(category: ErrorCategory) -> Self {
        Self {
            code: category.as_str().to_string(),
            message: category.user_message().to_string(),
            fields: None,
        }
    }

    /// Returns the category this error belongs to.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(&self.code)
    }
}

impl From<&AppError> for ActionError {
    fn from(error: &AppError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.user_message(),
            fields: error.field_errors().filter(|f| !f.is_empty()).cloned(),
        }
    }
}

impl From<AppError> for ActionError {
    fn from(error: AppError) -> Self {
        Self::from(&error)
    }
}

/// Outcome of an action.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionResult<T> {
    /// The action succeeded.
    Success(T),
    /// The action failed.
    Failure(ActionError),
}

impl<T> ActionResult<T> {
    /// Returns true for the success variant.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns the payload of a successful action.
    #[must_use]
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            Self::Failure(_) => None,
        }
    }

    /// Returns the error of a failed action.
    #[must_use]
    pub fn error(&self) -> Option<&ActionError> {
        match self {
            Self::Success(_) => None,
            Self::Failure(error) => Some(error),
        }
    }
}

impl<T> From<AppResult<T>> for ActionResult<T> {
    fn from(result: AppResult<T>) -> Self {
        match result {
            Ok(data) => Self::Success(data),
            Err(error) => Self::Failure(error.into()),
        }
    }
}

impl<T: Serialize> Serialize for ActionResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ActionResult", 2)?;
        match self {
            Self::Success(data) => {
                state.serialize_field("success", &true)?;
                state.serialize_field("data", data)?;
            }
            Self::Failure(error) => {
                state.serialize_field("success", &false)?;
                state.serialize_field("error", error)?;
            }
        }
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_shape() {
        let result: ActionResult<u32> = Ok(42).into();
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"success": true, "data": 42})
        );
    }

    #[test]
    fn test_failure_shape_uses_generic_message() {
        let result: ActionResult<u32> =
            Err(AppError::Internal("panic at src/ledger.rs:42".into())).into();
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "success": false,
                "error": {
                    "code": "server_error",
                    "message": ErrorCategory::ServerError.user_message(),
                }
            })
        );
    }

    #[test]
    fn test_failure_carries_field_errors() {
        let result: ActionResult<()> =
            Err(AppError::field("lines", "Debit and credit totals must match")).into();
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["error"]["code"], "validation");
        assert_eq!(
            value["error"]["fields"]["lines"][0],
            "Debit and credit totals must match"
        );
        assert!(!result.is_success());
        assert_eq!(result.error().map(ActionError::category), Some(ErrorCategory::Validation));
    }
}
