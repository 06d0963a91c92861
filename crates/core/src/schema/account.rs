//! Account input.

use serde::{Deserialize, Serialize};
use validator::Validate;
use choubo_shared::types::AccountId;

use super::common::ACCOUNT_CODE;
use crate::accounts::{Account, AccountCategory, AccountType};

/// A chart-of-accounts entry as submitted by a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct AccountInput {
    /// Account code, 3 to 10 digits.
    #[validate(regex(path = *ACCOUNT_CODE, message = "Account code must be 3 to 10 digits"))]
    pub code: String,
    /// Account name.
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Subcategory.
    #[serde(default)]
    pub category: Option<AccountCategory>,
    /// Parent account.
    #[serde(default)]
    pub parent_id: Option<AccountId>,
}

impl AccountInput {
    /// Converts the input into an active account with a fresh ID.
    #[must_use]
    pub fn into_account(self) -> Account {
        Account {
            id: AccountId::new(),
            code: self.code,
            name: self.name.trim().to_string(),
            account_type: self.account_type,
            category: self.category,
            parent_id: self.parent_id,
            is_active: true,
        }
    }
}
