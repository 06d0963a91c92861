//! Chart of accounts types.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use choubo_shared::types::AccountId;

use crate::ledger::balance::NormalBalance;

/// Top-level account type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// 資産
    Asset,
    /// 負債
    Liability,
    /// 純資産
    Equity,
    /// 収益
    Revenue,
    /// 費用
    Expense,
}

impl AccountType {
    /// Returns the side on which balances of this type increase.
    ///
    /// - Asset/Expense: debit-normal
    /// - Liability/Equity/Revenue: credit-normal
    #[must_use]
    pub const fn normal_balance(self) -> NormalBalance {
        match self {
            Self::Asset | Self::Expense => NormalBalance::Debit,
            Self::Liability | Self::Equity | Self::Revenue => NormalBalance::Credit,
        }
    }

    /// Returns true for balance sheet accounts.
    #[must_use]
    pub const fn is_balance_sheet(self) -> bool {
        matches!(self, Self::Asset | Self::Liability | Self::Equity)
    }

    /// Returns the lowercase wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Revenue => "revenue",
            Self::Expense => "expense",
        }
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asset" => Ok(Self::Asset),
            "liability" => Ok(Self::Liability),
            "equity" => Ok(Self::Equity),
            "revenue" => Ok(Self::Revenue),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown account type: {s}")),
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account subcategory, deciding where an account lands in the statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountCategory {
    /// 現金及び預金. Reported as a current asset; drives the cash flow statement.
    #[serde(alias = "cash")]
    CashAndDeposits,
    /// 流動資産
    #[serde(alias = "current_assets")]
    CurrentAsset,
    /// 固定資産
    #[serde(alias = "fixed_assets")]
    FixedAsset,
    /// 流動負債
    #[serde(alias = "current_liabilities")]
    CurrentLiability,
    /// 固定負債
    #[serde(alias = "long_term_liabilities")]
    LongTermLiability,
    /// 資本金 / 資本剰余金
    Capital,
    /// 利益剰余金
    #[serde(alias = "retained")]
    RetainedEarnings,
    /// 売上高
    Sales,
    /// 営業外収益 / 特別利益
    #[serde(alias = "non_operating_income")]
    OtherRevenue,
    /// 売上原価
    #[serde(alias = "cost_of_goods_sold")]
    CostOfSales,
    /// 販売費及び一般管理費
    #[serde(alias = "operating", alias = "sga")]
    OperatingExpense,
    /// 支払利息など
    #[serde(alias = "financial")]
    FinancialExpense,
    /// 特別損失・法人税等
    #[serde(alias = "other")]
    OtherExpense,
}

impl AccountCategory {
    /// Returns the account type this category belongs to.
    #[must_use]
    pub const fn account_type(self) -> AccountType {
        match self {
            Self::CashAndDeposits | Self::CurrentAsset | Self::FixedAsset => AccountType::Asset,
            Self::CurrentLiability | Self::LongTermLiability => AccountType::Liability,
            Self::Capital | Self::RetainedEarnings => AccountType::Equity,
            Self::Sales | Self::OtherRevenue => AccountType::Revenue,
            Self::CostOfSales
            | Self::OperatingExpense
            | Self::FinancialExpense
            | Self::OtherExpense => AccountType::Expense,
        }
    }

    /// Returns the category used when an account has none.
    #[must_use]
    pub const fn default_for(account_type: AccountType) -> Self {
        match account_type {
            AccountType::Asset => Self::CurrentAsset,
            AccountType::Liability => Self::CurrentLiability,
            AccountType::Equity => Self::Capital,
            AccountType::Revenue => Self::Sales,
            AccountType::Expense => Self::OperatingExpense,
        }
    }
}

/// An entry in the chart of accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account ID.
    pub id: AccountId,
    /// Account code (勘定科目コード).
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Optional subcategory.
    #[serde(default)]
    pub category: Option<AccountCategory>,
    /// Parent account in the tree.
    #[serde(default)]
    pub parent_id: Option<AccountId>,
    /// Inactive accounts accept no new postings.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Account {
    /// Creates an active top-level account without a category.
    #[must_use]
    pub fn new(code: impl Into<String>, name: impl Into<String>, account_type: AccountType) -> Self {
        Self {
            id: AccountId::new(),
            code: code.into(),
            name: name.into(),
            account_type,
            category: None,
            parent_id: None,
            is_active: true,
        }
    }

    /// Sets the category.
    #[must_use]
    pub fn with_category(mut self, category: AccountCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Sets the parent account.
    #[must_use]
    pub fn with_parent(mut self, parent_id: AccountId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Returns the effective category.
    ///
    /// A missing category, or one that contradicts the account type, falls
    /// back to the default category of the type.
    #[must_use]
    pub fn effective_category(&self) -> AccountCategory {
        match self.category {
            Some(category) if category.account_type() == self.account_type => category,
            _ => AccountCategory::default_for(self.account_type),
        }
    }

    /// Returns true for cash and deposit accounts.
    #[must_use]
    pub fn is_cash(&self) -> bool {
        self.effective_category() == AccountCategory::CashAndDeposits
    }
}
