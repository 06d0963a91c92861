//! Ledger error types for validation and state errors.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use choubo_shared::types::AccountId;

use choubo_shared::AppError;

use super::entry::EntryStatus;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Entry must have at least 2 lines.
    #[error("Journal entry must have at least 2 lines")]
    InsufficientLines,

    /// Entry is not balanced (debits != credits).
    #[error("Journal entry is not balanced. Debit: {debit}, Credit: {credit}")]
    Unbalanced {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    /// Entry has only debit lines or only credit lines.
    #[error("Journal entry must have both debit and credit lines")]
    SingleSided,

    /// A line has neither a debit nor a credit amount.
    #[error("Line {0} has no amount")]
    ZeroAmount(usize),

    /// A line has a negative amount.
    #[error("Line {0} has a negative amount")]
    NegativeAmount(usize),

    /// A line has both a debit and a credit amount.
    #[error("Line {0} must specify either debit or credit, not both")]
    BothSides(usize),

    // ========== Account Errors ==========
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Account is inactive and cannot be used.
    #[error("Account {0} is inactive")]
    AccountInactive(AccountId),

    // ========== Period / State Errors ==========
    /// The entry date falls in a locked period.
    #[error("Period is locked through {locked_through}; cannot post on {date}")]
    PeriodLocked {
        /// Entry date.
        date: NaiveDate,
        /// Last locked date.
        locked_through: NaiveDate,
    },

    /// Status change not allowed.
    #[error("Cannot change status from {from:?} to {to:?}")]
    InvalidStatusTransition {
        /// Current status.
        from: EntryStatus,
        /// Requested status.
        to: EntryStatus,
    },

    /// Only drafts can be edited or deleted.
    #[error("Only draft entries can be modified")]
    NotEditable,

    /// Date range is inverted.
    #[error("Invalid date range: start {from} is after end {to}")]
    InvalidDateRange {
        /// Start date.
        from: NaiveDate,
        /// End date.
        to: NaiveDate,
    },
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientLines => "INSUFFICIENT_LINES",
            Self::Unbalanced { .. } => "UNBALANCED_ENTRY",
            Self::SingleSided => "SINGLE_SIDED_ENTRY",
            Self::ZeroAmount(_) => "ZERO_AMOUNT",
            Self::NegativeAmount(_) => "NEGATIVE_AMOUNT",
            Self::BothSides(_) => "BOTH_SIDES",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
            Self::PeriodLocked { .. } => "PERIOD_LOCKED",
            Self::InvalidStatusTransition { .. } => "INVALID_STATUS_TRANSITION",
            Self::NotEditable => "NOT_EDITABLE",
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
        }
    }

    /// Returns the field this error should be reported against.
    #[must_use]
    pub fn field(&self) -> String {
        match self {
            Self::InsufficientLines | Self::Unbalanced { .. } | Self::SingleSided => {
                "lines".to_string()
            }
            Self::ZeroAmount(i) | Self::NegativeAmount(i) | Self::BothSides(i) => {
                format!("lines[{i}].debit")
            }
            Self::AccountNotFound(_) | Self::AccountInactive(_) => "lines".to_string(),
            Self::PeriodLocked { .. } => "date".to_string(),
            Self::InvalidStatusTransition { .. } | Self::NotEditable => "status".to_string(),
            Self::InvalidDateRange { .. } => "from".to_string(),
        }
    }

    /// Returns the message shown to users for this error.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InsufficientLines => "At least two lines are required",
            Self::Unbalanced { .. } => "Debit and credit totals must match",
            Self::SingleSided => "Both debit and credit lines are required",
            Self::ZeroAmount(_) => "Enter a debit or credit amount",
            Self::NegativeAmount(_) => "Amounts cannot be negative",
            Self::BothSides(_) => "Enter either a debit or a credit amount, not both",
            Self::AccountNotFound(_) => "The selected account does not exist",
            Self::AccountInactive(_) => "The selected account is inactive",
            Self::PeriodLocked { .. } => "This period is locked",
            Self::InvalidStatusTransition { .. } => "This status change is not allowed",
            Self::NotEditable => "Only draft entries can be changed",
            Self::InvalidDateRange { .. } => "The start date must not be after the end date",
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(error: LedgerError) -> Self {
        match error {
            LedgerError::AccountNotFound(id) => Self::NotFound(format!("account {id}")),
            other => Self::field(other.field(), other.user_message()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(LedgerError::InsufficientLines.error_code(), "INSUFFICIENT_LINES");
        assert_eq!(
            LedgerError::Unbalanced {
                debit: Decimal::new(100, 0),
                credit: Decimal::new(50, 0),
            }
            .error_code(),
            "UNBALANCED_ENTRY"
        );
        assert_eq!(LedgerError::ZeroAmount(0).error_code(), "ZERO_AMOUNT");
        assert_eq!(LedgerError::NegativeAmount(1).error_code(), "NEGATIVE_AMOUNT");
    }

    #[test]
    fn test_error_display() {
        let err = LedgerError::Unbalanced {
            debit: Decimal::new(100_000, 0),
            credit: Decimal::new(50_000, 0),
        };
        assert_eq!(
            err.to_string(),
            "Journal entry is not balanced. Debit: 100000, Credit: 50000"
        );
    }

    #[test]
    fn test_converts_to_field_error() {
        let app: AppError = LedgerError::BothSides(2).into();
        let fields = app.field_errors().unwrap();
        assert_eq!(
            fields.get("lines[2].debit"),
            Some(&["Enter either a debit or a credit amount, not both".to_string()][..])
        );
    }

    #[test]
    fn test_unknown_account_is_not_found() {
        let app: AppError = LedgerError::AccountNotFound(AccountId::new()).into();
        assert_eq!(app.status_code(), 404);
        assert!(!app.user_message().contains('-'));
    }
}
