//! Partner input.

use serde::{Deserialize, Serialize};
use validator::Validate;
use choubo_shared::types::PartnerId;

use super::common::{BANK_ACCOUNT_NUMBER, PARTNER_CODE, PHONE, POSTAL_CODE};
use crate::partners::{BankAccount, DepositKind, Partner, PartnerType};

/// A customer or supplier as submitted by a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PartnerInput {
    /// Partner code.
    #[validate(regex(
        path = *PARTNER_CODE,
        message = "Code must be 1 to 20 letters, digits, '-' or '_'"
    ))]
    pub code: String,
    /// Partner name.
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: String,
    /// Partner role.
    pub partner_type: PartnerType,
    #[serde(default)]
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[serde(default)]
    #[validate(regex(path = *PHONE, message = "Invalid phone number"))]
    pub phone: Option<String>,
    #[serde(default)]
    #[validate(regex(path = *POSTAL_CODE, message = "Postal code must look like 123-4567"))]
    pub postal_code: Option<String>,
    #[serde(default)]
    #[validate(length(max = 200, message = "Address must be at most 200 characters"))]
    pub address: Option<String>,
    /// Transfer account.
    #[serde(default)]
    #[validate(nested)]
    pub bank_account: Option<BankAccountInput>,
}

/// Bank account fields of a partner form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct BankAccountInput {
    /// Bank name.
    #[validate(length(min = 1, max = 100, message = "Bank name must be 1 to 100 characters"))]
    pub bank_name: String,
    /// Branch name.
    #[validate(length(min = 1, max = 100, message = "Branch name must be 1 to 100 characters"))]
    pub branch_name: String,
    /// Deposit type (預金種目).
    pub deposit_kind: DepositKind,
    /// Account number.
    #[validate(regex(path = *BANK_ACCOUNT_NUMBER, message = "Account number must be 7 digits"))]
    pub account_number: String,
    /// Account holder (口座名義).
    #[validate(length(min = 1, max = 100, message = "Holder name must be 1 to 100 characters"))]
    pub holder_name: String,
}

impl PartnerInput {
    /// Converts the input into a partner with a fresh ID.
    ///
    /// Blank optional fields are dropped.
    #[must_use]
    pub fn into_partner(self) -> Partner {
        let present = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        Partner {
            id: PartnerId::new(),
            code: self.code,
            name: self.name.trim().to_string(),
            partner_type: self.partner_type,
            email: present(self.email),
            phone: present(self.phone),
            postal_code: present(self.postal_code),
            address: present(self.address),
            bank_account: self.bank_account.map(|b| BankAccount {
                bank_name: b.bank_name,
                branch_name: b.branch_name,
                deposit_kind: b.deposit_kind,
                account_number: b.account_number,
                holder_name: b.holder_name,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::field_errors;

    fn input() -> PartnerInput {
        PartnerInput {
            code: "C-001".into(),
            name: "株式会社サンプル".into(),
            partner_type: PartnerType::Customer,
            email: Some("info@example.co.jp".into()),
            phone: Some("03-1234-5678".into()),
            postal_code: Some("100-0001".into()),
            address: None,
            bank_account: Some(BankAccountInput {
                bank_name: "みずほ銀行".into(),
                branch_name: "本店".into(),
                deposit_kind: DepositKind::Ordinary,
                account_number: "1234567".into(),
                holder_name: "カ)サンプル".into(),
            }),
        }
    }

    #[test]
    fn test_valid_partner() {
        assert!(field_errors(&input()).is_empty());
    }

    #[test]
    fn test_contact_and_bank_errors() {
        let mut bad = input();
        bad.code = "C 001".into();
        bad.email = Some("not-an-email".into());
        bad.phone = Some("1234".into());
        bad.postal_code = Some("12-34567".into());
        if let Some(bank) = bad.bank_account.as_mut() {
            bank.account_number = "12345".into();
        }

        let errors = field_errors(&bad);
        for field in ["code", "email", "phone", "postal_code", "bank_account.account_number"] {
            assert!(errors.contains(field), "missing {field}: {errors:?}");
        }
    }

    #[test]
    fn test_into_partner_drops_blank_fields() {
        let mut raw = input();
        raw.address = Some("  ".into());
        let partner = raw.into_partner();
        assert!(partner.address.is_none());
        assert_eq!(partner.bank_account.map(|b| b.account_number), Some("1234567".into()));
    }
}
