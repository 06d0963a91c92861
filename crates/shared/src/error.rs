//! Application-wide error types.
//!
//! Every error is assigned an [`ErrorCategory`]. The category decides the
//! HTTP status and the generic message shown to users; the inner detail
//! string is for logs only and never leaves the process.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Error categories exposed to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Caller is not signed in.
    Authentication,
    /// Caller lacks permission.
    Authorization,
    /// Input failed validation or a business rule.
    Validation,
    /// Requested resource does not exist.
    NotFound,
    /// Too many requests.
    RateLimit,
    /// Upstream network failure.
    Network,
    /// Storage failure.
    Database,
    /// Anything else.
    ServerError,
}

impl ErrorCategory {
    /// Returns the wire code for this category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Authentication => "authentication",
            Self::Authorization => "authorization",
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::RateLimit => "rate_limit",
            Self::Network => "network",
            Self::Database => "database",
            Self::ServerError => "server_error",
        }
    }

    /// Returns the generic message shown to users.
    ///
    /// These never contain identifiers, hostnames or stack traces.
    #[must_use]
    pub const fn user_message(self) -> &'static str {
        match self {
            Self::Authentication => "Please sign in to continue.",
            Self::Authorization => "You do not have permission to perform this action.",
            Self::Validation => "Some of the submitted values are invalid.",
            Self::NotFound => "The requested resource was not found.",
            Self::RateLimit => "Too many requests. Please wait and try again.",
            Self::Network => "A network error occurred. Please try again.",
            Self::Database => "The data could not be saved or loaded. Please try again.",
            Self::ServerError => "An unexpected error occurred. Please try again later.",
        }
    }

    /// Returns the HTTP status code for this category.
    #[must_use]
    pub const fn status_code(self) -> u16 {
        match self {
            Self::Authentication => 401,
            Self::Authorization => 403,
            Self::Validation => 400,
            Self::NotFound => 404,
            Self::RateLimit => 429,
            Self::Network => 502,
            Self::Database | Self::ServerError => 500,
        }
    }

    /// Parses a category code, defaulting unknown codes to `ServerError`.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "authentication" => Self::Authentication,
            "authorization" => Self::Authorization,
            "validation" => Self::Validation,
            "not_found" => Self::NotFound,
            "rate_limit" => Self::RateLimit,
            "network" => Self::Network,
            "database" => Self::Database,
            _ => Self::ServerError,
        }
    }
}

/// Per-field validation messages, keyed by field path (`lines[0].debit`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Creates an empty set of field errors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message against a field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Merges another set of field errors into this one.
    pub fn merge(&mut self, other: Self) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    /// Returns true if no field has errors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the messages recorded for a field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Returns true if the field has at least one message.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Iterates over fields and their messages.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }

    /// Converts to `Ok(())` when empty, otherwise a validation error.
    pub fn into_result(self) -> AppResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }

    fn collect(&mut self, prefix: &str, errors: &ValidationErrors) {
        for (field, kind) in errors.errors() {
            let path = if prefix.is_empty() {
                field.to_string()
            } else {
                format!("{prefix}.{field}")
            };
            match kind {
                ValidationErrorsKind::Field(list) => {
                    for error in list {
                        let message = error
                            .message
                            .clone()
                            .unwrap_or_else(|| Cow::Owned(format!("Invalid value ({})", error.code)));
                        self.add(path.clone(), message);
                    }
                }
                ValidationErrorsKind::Struct(inner) => self.collect(&path, inner),
                ValidationErrorsKind::List(items) => {
                    for (index, inner) in items {
                        self.collect(&format!("{path}[{index}]"), inner);
                    }
                }
            }
        }
    }
}

impl From<&ValidationErrors> for FieldErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let mut fields = Self::new();
        fields.collect("", errors);
        fields
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        Self::from(&errors)
    }
}

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Access denied.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Input validation failed, aggregated per field.
    #[error("Validation failed on {} field(s)", .0.iter().count())]
    Validation(FieldErrors),

    /// Business rule violation.
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// Network error talking to an upstream service.
    #[error("Network error: {0}")]
    Network(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Creates a validation error for a single field.
    #[must_use]
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut fields = FieldErrors::new();
        fields.add(field, message);
        Self::Validation(fields)
    }

    /// Returns the category of this error.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Unauthorized(_) => ErrorCategory::Authentication,
            Self::Forbidden(_) => ErrorCategory::Authorization,
            Self::NotFound(_) => ErrorCategory::NotFound,
            Self::Validation(_) | Self::BusinessRule(_) => ErrorCategory::Validation,
            Self::RateLimited(_) => ErrorCategory::RateLimit,
            Self::Network(_) => ErrorCategory::Network,
            Self::Database(_) => ErrorCategory::Database,
            Self::Internal(_) => ErrorCategory::ServerError,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.category().status_code()
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        self.category().as_str()
    }

    /// Returns the message safe to show to users.
    ///
    /// Business rule messages are authored for users and pass through;
    /// everything else collapses to the category's generic message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::BusinessRule(message) => message.clone(),
            other => other.category().user_message().to_string(),
        }
    }

    /// Returns the per-field errors, if any.
    #[must_use]
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation(fields) => Some(fields),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use validator::Validate;

    #[rstest]
    #[case(AppError::Unauthorized(String::new()), 401, "authentication")]
    #[case(AppError::Forbidden(String::new()), 403, "authorization")]
    #[case(AppError::NotFound(String::new()), 404, "not_found")]
    #[case(AppError::Validation(FieldErrors::new()), 400, "validation")]
    #[case(AppError::BusinessRule(String::new()), 400, "validation")]
    #[case(AppError::RateLimited(String::new()), 429, "rate_limit")]
    #[case(AppError::Network(String::new()), 502, "network")]
    #[case(AppError::Database(String::new()), 500, "database")]
    #[case(AppError::Internal(String::new()), 500, "server_error")]
    fn test_status_and_code(#[case] error: AppError, #[case] status: u16, #[case] code: &str) {
        assert_eq!(error.status_code(), status);
        assert_eq!(error.error_code(), code);
    }

    #[test]
    fn test_user_message_hides_internal_detail() {
        let err = AppError::Database("connection to db-primary.internal:5432 refused".into());
        let message = err.user_message();
        assert!(!message.contains("db-primary"));
        assert!(!message.contains("5432"));
        assert_eq!(message, ErrorCategory::Database.user_message());
    }

    #[test]
    fn test_business_rule_message_passes_through() {
        let err = AppError::BusinessRule("Debit and credit totals must match".into());
        assert_eq!(err.user_message(), "Debit and credit totals must match");
    }

    #[test]
    fn test_unknown_code_defaults_to_server_error() {
        assert_eq!(ErrorCategory::from_code("teapot"), ErrorCategory::ServerError);
        assert_eq!(ErrorCategory::from_code("not_found"), ErrorCategory::NotFound);
    }

    #[test]
    fn test_field_errors_merge_keeps_all_messages() {
        let mut a = FieldErrors::new();
        a.add("code", "Code is required");
        let mut b = FieldErrors::new();
        b.add("code", "Code must be digits");
        b.add("name", "Name is required");

        a.merge(b);

        assert_eq!(a.get("code").map(<[String]>::len), Some(2));
        assert!(a.contains("name"));
        assert!(a.into_result().is_err());
    }

    #[derive(Validate)]
    struct Line {
        #[validate(length(min = 1, message = "Memo is required"))]
        memo: String,
    }

    #[derive(Validate)]
    struct Form {
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
        #[validate(range(min = 1, message = "Count must be positive"))]
        count: i32,
        #[validate(nested)]
        lines: Vec<Line>,
    }

    #[test]
    fn test_validation_errors_are_aggregated_per_field() {
        let form = Form {
            name: String::new(),
            count: 0,
            lines: vec![
                Line { memo: "ok".into() },
                Line { memo: String::new() },
            ],
        };

        let fields = FieldErrors::from(form.validate().unwrap_err());

        assert_eq!(fields.get("name"), Some(&["Name is required".to_string()][..]));
        assert_eq!(fields.get("count"), Some(&["Count must be positive".to_string()][..]));
        assert!(fields.contains("lines[1].memo"));
        assert!(!fields.contains("lines[0].memo"));
    }
}
