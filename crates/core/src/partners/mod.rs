//! Customers and suppliers.

use serde::{Deserialize, Serialize};
use choubo_shared::AppResult;
use choubo_shared::types::PartnerId;

use crate::schema::{PartnerInput, field_errors};

/// Partner role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartnerType {
    /// 得意先
    Customer,
    /// 仕入先
    Supplier,
    /// Both customer and supplier.
    Both,
}

impl PartnerType {
    /// Returns true if we sell to this partner.
    #[must_use]
    pub const fn is_customer(self) -> bool {
        matches!(self, Self::Customer | Self::Both)
    }

    /// Returns true if we buy from this partner.
    #[must_use]
    pub const fn is_supplier(self) -> bool {
        matches!(self, Self::Supplier | Self::Both)
    }
}

/// Japanese bank deposit kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepositKind {
    /// 普通
    Ordinary,
    /// 当座
    Checking,
    /// 貯蓄
    Savings,
}

/// Bank account used for transfers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccount {
    /// Bank name.
    pub bank_name: String,
    /// Branch name.
    pub branch_name: String,
    /// Deposit kind.
    pub deposit_kind: DepositKind,
    /// Seven-digit account number.
    pub account_number: String,
    /// Account holder name (kana).
    pub holder_name: String,
}

/// A customer or supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partner {
    /// Partner ID.
    pub id: PartnerId,
    /// Partner code.
    pub code: String,
    /// Partner name.
    pub name: String,
    /// Partner role.
    pub partner_type: PartnerType,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// Contact phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Postal code (〒).
    #[serde(default)]
    pub postal_code: Option<String>,
    /// Address.
    #[serde(default)]
    pub address: Option<String>,
    /// Bank account.
    #[serde(default)]
    pub bank_account: Option<BankAccount>,
}

/// Partner service.
pub struct PartnerService;

impl PartnerService {
    /// Validates a partner form against the existing partners.
    ///
    /// # Errors
    ///
    /// Returns field errors for schema problems or a code already in use.
    pub fn prepare_partner(input: PartnerInput, existing: &[Partner]) -> AppResult<Partner> {
        let mut errors = field_errors(&input);
        if existing.iter().any(|p| p.code.eq_ignore_ascii_case(&input.code)) {
            errors.add("code", "This partner code is already in use");
        }
        errors.into_result()?;
        Ok(input.into_partner())
    }
}
