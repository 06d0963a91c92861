//! Chart of accounts error types.

use thiserror::Error;
use choubo_shared::types::AccountId;

/// Errors raised while building or changing the account tree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountError {
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Two accounts share an ID.
    #[error("Duplicate account id: {0}")]
    DuplicateId(AccountId),

    /// Two accounts share a code.
    #[error("Duplicate account code: {0}")]
    DuplicateCode(String),

    /// Parent account does not exist.
    #[error("Parent {parent} of account {account} does not exist")]
    UnknownParent {
        /// The child account.
        account: AccountId,
        /// The missing parent.
        parent: AccountId,
    },

    /// Parent links form a cycle through this account.
    #[error("Account {0} is part of a parent cycle")]
    Cycle(AccountId),
}

impl AccountError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::DuplicateId(_) => "DUPLICATE_ACCOUNT_ID",
            Self::DuplicateCode(_) => "DUPLICATE_ACCOUNT_CODE",
            Self::UnknownParent { .. } => "UNKNOWN_PARENT",
            Self::Cycle(_) => "ACCOUNT_CYCLE",
        }
    }
}

impl From<AccountError> for choubo_shared::AppError {
    fn from(error: AccountError) -> Self {
        match error {
            AccountError::AccountNotFound(id) => Self::NotFound(format!("account {id}")),
            AccountError::DuplicateId(_) | AccountError::DuplicateCode(_) => {
                Self::field("code", "This account code is already in use")
            }
            AccountError::UnknownParent { .. } => {
                Self::field("parent_id", "The parent account does not exist")
            }
            AccountError::Cycle(_) => {
                Self::field("parent_id", "An account cannot be its own ancestor")
            }
        }
    }
}
