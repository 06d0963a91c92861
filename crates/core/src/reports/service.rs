//! Report generation service.
//!
//! Account balances are bucketed by effective category into a fixed
//! statement layout. Section totals include every account; the display
//! lists leave out zero balances.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::cash_flow::cash_flow;
use super::error::ReportError;
use super::types::{
    AssetSections, BalanceSheetReport, CashFlowReport, EquitySections, ExpenseSections, LiabilitySections,
    ProfitLossReport, Report, ReportKind, ReportLine, RevenueSections, TrialBalanceReport,
    TrialBalanceRow,
};
use crate::accounts::{Account, AccountCategory, AccountTree};
use crate::ledger::{AccountBalance, DateRange, LedgerLine, account_balances};

/// Service for generating financial reports.
pub struct ReportService;

impl ReportService {
    /// Generates a report of the given kind.
    ///
    /// The balance sheet only uses the end of the range.
    ///
    /// # Errors
    ///
    /// Fails on an inconsistent chart of accounts, an inverted range or a
    /// line referencing an unknown account.
    pub fn generate(
        kind: ReportKind,
        accounts: &[Account],
        lines: &[LedgerLine],
        range: &DateRange,
        currency: &str,
    ) -> Result<Report, ReportError> {
        Ok(match kind {
            ReportKind::BalanceSheet => {
                range.validate()?;
                Report::BalanceSheet(Self::balance_sheet(accounts, lines, range.to, currency)?)
            }
            ReportKind::ProfitLoss => Report::ProfitLoss(Self::profit_loss(accounts, lines, range, currency)?),
            ReportKind::TrialBalance => {
                Report::TrialBalance(Self::trial_balance(accounts, lines, range, currency)?)
            }
            ReportKind::CashFlow => Report::CashFlow(Self::cash_flow(accounts, lines, range, currency)?),
        })
    }

    /// Generates a balance sheet as of a date.
    ///
    /// Revenue and expenses not yet closed into retained earnings show up as
    /// net profit on the equity side, so the statement balances without
    /// closing entries.
    pub fn balance_sheet(
        accounts: &[Account],
        lines: &[LedgerLine],
        as_of: Option<NaiveDate>,
        currency: &str,
    ) -> Result<BalanceSheetReport, ReportError> {
        let balances = Self::balances(accounts, lines, &DateRange { from: None, to: as_of })?;
        let (assets, liabilities, equity) = categorize_balance_sheet(&balances);
        let (revenue, expenses) = categorize_profit_loss(&balances);

        let net_profit = revenue.total - expenses.total;
        let liabilities_and_equity = liabilities.total + equity.total + net_profit;

        Ok(BalanceSheetReport {
            as_of,
            currency: currency.to_string(),
            is_balanced: assets.total == liabilities_and_equity,
            assets,
            liabilities,
            equity,
            net_profit,
            liabilities_and_equity,
        })
    }

    /// Generates a profit and loss statement for a period.
    ///
    /// # Errors
    ///
    /// Same as [`ReportService::generate`].
    pub fn profit_loss(
        accounts: &[Account],
        lines: &[LedgerLine],
        range: &DateRange,
        currency: &str,
    ) -> Result<ProfitLossReport, ReportError> {
        let balances = Self::balances(accounts, lines, range)?;
        let (revenue, expenses) = categorize_profit_loss(&balances);

        let gross_profit = revenue.total - expenses.cost_of_sales.total;
        let operating_profit = gross_profit - expenses.operating.total;
        let net_profit = revenue.total - expenses.total;

        Ok(ProfitLossReport {
            from: range.from,
            to: range.to,
            currency: currency.to_string(),
            revenue,
            expenses,
            gross_profit,
            operating_profit,
            net_profit,
        })
    }

    /// Generates a trial balance for a period.
    ///
    /// Accounts without activity are left out.
    pub fn trial_balance(
        accounts: &[Account],
        lines: &[LedgerLine],
        range: &DateRange,
        currency: &str,
    ) -> Result<TrialBalanceReport, ReportError> {
        let balances = Self::balances(accounts, lines, range)?;

        let total_debit: Decimal = balances.iter().map(|b| b.debit_total).sum();
        let total_credit: Decimal = balances.iter().map(|b| b.credit_total).sum();
        let rows = balances
            .into_iter()
            .filter(|b| !b.debit_total.is_zero() || !b.credit_total.is_zero())
            .map(|b| TrialBalanceRow {
                account_id: b.account_id,
                code: b.code,
                name: b.name,
                account_type: b.account_type,
                debit: b.debit_total,
                credit: b.credit_total,
                balance: b.balance,
            })
            .collect();

        Ok(TrialBalanceReport {
            from: range.from,
            to: range.to,
            currency: currency.to_string(),
            rows,
            total_debit,
            total_credit,
            is_balanced: total_debit == total_credit,
        })
    }

    /// Generates a direct-method cash flow statement for a period.
    pub fn cash_flow(
        accounts: &[Account],
        lines: &[LedgerLine],
        range: &DateRange,
        currency: &str,
    ) -> Result<CashFlowReport, ReportError> {
        check_chart(accounts)?;
        cash_flow(accounts, lines, range, currency)
    }

    fn balances(
        accounts: &[Account],
        lines: &[LedgerLine],
        range: &DateRange,
    ) -> Result<Vec<AccountBalance>, ReportError> {
        check_chart(accounts)?;
        Ok(account_balances(accounts, lines, range)?)
    }
}

/// Rejects charts with duplicate codes, unknown parents or cycles.
fn check_chart(accounts: &[Account]) -> Result<(), ReportError> {
    AccountTree::build(accounts.to_vec())?;
    Ok(())
}

fn report_line(balance: &AccountBalance) -> ReportLine {
    ReportLine {
        account_id: balance.account_id,
        code: balance.code.clone(),
        name: balance.name.clone(),
        amount: balance.balance,
    }
}

/// Buckets balance sheet accounts by category.
#[must_use]
pub fn categorize_balance_sheet(
    balances: &[AccountBalance],
) -> (AssetSections, LiabilitySections, EquitySections) {
    let mut assets = AssetSections::default();
    let mut liabilities = LiabilitySections::default();
    let mut equity = EquitySections::default();

    for balance in balances {
        let line = report_line(balance);
        match balance.category {
            AccountCategory::CashAndDeposits | AccountCategory::CurrentAsset => assets.current.push(line),
            AccountCategory::FixedAsset => assets.fixed.push(line),
            AccountCategory::CurrentLiability => liabilities.current.push(line),
            AccountCategory::LongTermLiability => liabilities.long_term.push(line),
            AccountCategory::Capital => equity.capital.push(line),
            AccountCategory::RetainedEarnings => equity.retained.push(line),
            _ => {}
        }
    }

    assets.total = assets.current.total + assets.fixed.total;
    liabilities.total = liabilities.current.total + liabilities.long_term.total;
    equity.total = equity.capital.total + equity.retained.total;
    (assets, liabilities, equity)
}

/// Buckets revenue and expense accounts by category.
#[must_use]
pub fn categorize_profit_loss(balances: &[AccountBalance]) -> (RevenueSections, ExpenseSections) {
    let mut revenue = RevenueSections::default();
    let mut expenses = ExpenseSections::default();

    for balance in balances {
        let line = report_line(balance);
        match balance.category {
            AccountCategory::Sales => revenue.sales.push(line),
            AccountCategory::OtherRevenue => revenue.other.push(line),
            AccountCategory::CostOfSales => expenses.cost_of_sales.push(line),
            AccountCategory::OperatingExpense => expenses.operating.push(line),
            AccountCategory::FinancialExpense => expenses.financial.push(line),
            AccountCategory::OtherExpense => expenses.other.push(line),
            _ => {}
        }
    }

    revenue.total = revenue.sales.total + revenue.other.total;
    expenses.total = expenses.cost_of_sales.total
        + expenses.operating.total
        + expenses.financial.total
        + expenses.other.total;
    (revenue, expenses)
}
