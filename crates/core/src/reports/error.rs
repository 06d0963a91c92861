//! Report error types.

use thiserror::Error;

use choubo_shared::AppError;

use crate::accounts::AccountError;
use crate::ledger::LedgerError;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Unknown report kind in a request.
    #[error("Unknown report kind: {0}")]
    UnknownKind(String),

    /// The chart of accounts is inconsistent.
    #[error(transparent)]
    Account(#[from] AccountError),

    /// Lines could not be aggregated.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// CSV output failed.
    #[error("Export failed: {0}")]
    Export(String),
}

impl ReportError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownKind(_) => "UNKNOWN_REPORT_KIND",
            Self::Account(e) => e.error_code(),
            Self::Ledger(e) => e.error_code(),
            Self::Export(_) => "EXPORT_FAILED",
        }
    }
}

impl From<csv::Error> for ReportError {
    fn from(error: csv::Error) -> Self {
        Self::Export(error.to_string())
    }
}

impl From<ReportError> for AppError {
    fn from(error: ReportError) -> Self {
        match error {
            ReportError::UnknownKind(kind) => Self::NotFound(format!("report {kind}")),
            ReportError::Account(e) => e.into(),
            ReportError::Ledger(e) => e.into(),
            ReportError::Export(message) => Self::Internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_unknown_kind_is_not_found() {
        let app: AppError = ReportError::UnknownKind("foo".into()).into();
        assert_eq!(app.status_code(), 404);
    }

    #[test]
    fn test_invalid_range_is_validation() {
        let from = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let err = ReportError::from(LedgerError::InvalidDateRange { from, to });
        assert_eq!(err.error_code(), "INVALID_DATE_RANGE");
        let app: AppError = err.into();
        assert!(app.field_errors().unwrap().contains("from"));
    }
}
