//! Report data types.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use choubo_shared::types::AccountId;

use super::error::ReportError;
use crate::accounts::AccountType;

/// Report kinds, as used in URLs and export file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    /// 貸借対照表
    BalanceSheet,
    /// 損益計算書
    ProfitLoss,
    /// 試算表
    TrialBalance,
    /// キャッシュフロー計算書
    CashFlow,
}

impl ReportKind {
    /// Returns the URL slug.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BalanceSheet => "balance-sheet",
            Self::ProfitLoss => "profit-loss",
            Self::TrialBalance => "trial-balance",
            Self::CashFlow => "cash-flow",
        }
    }
}

impl FromStr for ReportKind {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "balance-sheet" => Ok(Self::BalanceSheet),
            "profit-loss" => Ok(Self::ProfitLoss),
            "trial-balance" => Ok(Self::TrialBalance),
            "cash-flow" => Ok(Self::CashFlow),
            other => Err(ReportError::UnknownKind(other.to_string())),
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One account row of a statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLine {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Balance on the account's normal side.
    pub amount: Decimal,
}

/// A list of accounts and their total.
///
/// `total` covers every account of the section, including the zero-balance
/// accounts left out of `accounts`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSection {
    /// Section total.
    pub total: Decimal,
    /// Accounts with a non-zero balance, in code order.
    pub accounts: Vec<ReportLine>,
}

impl ReportSection {
    /// Adds an account balance.
    pub fn push(&mut self, line: ReportLine) {
        self.total += line.amount;
        if !line.amount.is_zero() {
            self.accounts.push(line);
        }
    }
}

/// 資産の部
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetSections {
    /// 流動資産
    pub current: ReportSection,
    /// 固定資産
    pub fixed: ReportSection,
    /// Total assets.
    pub total: Decimal,
}

/// 負債の部
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiabilitySections {
    /// 流動負債
    pub current: ReportSection,
    /// 固定負債
    pub long_term: ReportSection,
    /// Total liabilities.
    pub total: Decimal,
}

/// 純資産の部
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquitySections {
    /// 資本金
    pub capital: ReportSection,
    /// 利益剰余金
    pub retained: ReportSection,
    /// Total equity, before unclosed profit.
    pub total: Decimal,
}

/// Revenue buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueSections {
    /// 売上高
    pub sales: ReportSection,
    /// 営業外収益
    pub other: ReportSection,
    /// Total revenue.
    pub total: Decimal,
}

/// Expense buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseSections {
    /// 売上原価
    pub cost_of_sales: ReportSection,
    /// 販売費及び一般管理費
    pub operating: ReportSection,
    /// Interest and other financial costs.
    pub financial: ReportSection,
    /// Everything else.
    pub other: ReportSection,
    /// Total expenses.
    pub total: Decimal,
}

/// Balance sheet report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheetReport {
    /// As of date; `None` means everything booked.
    pub as_of: Option<NaiveDate>,
    /// Currency code.
    pub currency: String,
    /// Assets.
    pub assets: AssetSections,
    /// Liabilities.
    pub liabilities: LiabilitySections,
    /// Equity.
    pub equity: EquitySections,
    /// Profit not yet closed into retained earnings.
    pub net_profit: Decimal,
    /// Liabilities + equity + net profit.
    pub liabilities_and_equity: Decimal,
    /// Whether assets equal liabilities plus equity.
    pub is_balanced: bool,
}

/// Profit and loss report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitLossReport {
    /// Period start.
    pub from: Option<NaiveDate>,
    /// Period end.
    pub to: Option<NaiveDate>,
    /// Currency code.
    pub currency: String,
    /// Revenue.
    pub revenue: RevenueSections,
    /// Expenses.
    pub expenses: ExpenseSections,
    /// 売上総利益: revenue - cost of sales.
    pub gross_profit: Decimal,
    /// 営業利益: gross profit - operating expenses.
    pub operating_profit: Decimal,
    /// 当期純利益: revenue - expenses.
    pub net_profit: Decimal,
}

/// One account of the trial balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Debit total for the period.
    pub debit: Decimal,
    /// Credit total for the period.
    pub credit: Decimal,
    /// Balance on the account's normal side.
    pub balance: Decimal,
}

/// Trial balance report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceReport {
    /// Period start.
    pub from: Option<NaiveDate>,
    /// Period end.
    pub to: Option<NaiveDate>,
    /// Currency code.
    pub currency: String,
    /// Accounts with activity, in code order.
    pub rows: Vec<TrialBalanceRow>,
    /// Total debit.
    pub total_debit: Decimal,
    /// Total credit.
    pub total_credit: Decimal,
    /// Whether debits equal credits.
    pub is_balanced: bool,
}

/// Cash flow activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashFlowActivity {
    /// 営業活動
    Operating,
    /// 投資活動
    Investing,
    /// 財務活動
    Financing,
}

impl CashFlowActivity {
    /// Returns the export label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Operating => "operating",
            Self::Investing => "investing",
            Self::Financing => "financing",
        }
    }
}

/// Cash moved because of one counterpart account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowItem {
    /// Counterpart account.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Positive for cash in.
    pub amount: Decimal,
}

/// Items and total of one activity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowSection {
    /// Net cash of the activity.
    pub total: Decimal,
    /// Items in code order.
    pub items: Vec<CashFlowItem>,
}

/// Direct-method cash flow report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowReport {
    /// Period start.
    pub from: Option<NaiveDate>,
    /// Period end.
    pub to: Option<NaiveDate>,
    /// Currency code.
    pub currency: String,
    /// Cash before the period.
    pub opening_cash: Decimal,
    /// Operating activities.
    pub operating: CashFlowSection,
    /// Investing activities.
    pub investing: CashFlowSection,
    /// Financing activities.
    pub financing: CashFlowSection,
    /// Sum of the three activities.
    pub net_change: Decimal,
    /// Cash at the end of the period.
    pub closing_cash: Decimal,
}

/// Any generated report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Report {
    BalanceSheet(BalanceSheetReport),
    ProfitLoss(ProfitLossReport),
    TrialBalance(TrialBalanceReport),
    CashFlow(CashFlowReport),
}

impl Report {
    /// Returns the report kind.
    #[must_use]
    pub const fn kind(&self) -> ReportKind {
        match self {
            Self::BalanceSheet(_) => ReportKind::BalanceSheet,
            Self::ProfitLoss(_) => ReportKind::ProfitLoss,
            Self::TrialBalance(_) => ReportKind::TrialBalance,
            Self::CashFlow(_) => ReportKind::CashFlow,
        }
    }
}
