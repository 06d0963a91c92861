//! Account balance and running balance calculations.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use choubo_shared::types::{AccountId, JournalEntryId};

use crate::accounts::{Account, AccountCategory, AccountType};

use super::entry::LedgerLine;
use super::error::LedgerError;

/// Side on which an account's balance increases.
///
/// - Asset/Expense: balance += debit - credit (debit-normal)
/// - Liability/Equity/Revenue: balance += credit - debit (credit-normal)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalBalance {
    /// Debit-normal accounts (Asset, Expense)
    Debit,
    /// Credit-normal accounts (Liability, Equity, Revenue)
    Credit,
}

impl NormalBalance {
    /// Calculates the balance change for a line.
    #[must_use]
    pub fn balance_change(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            Self::Debit => debit - credit,
            Self::Credit => credit - debit,
        }
    }
}

/// Inclusive date bounds; either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First included date.
    #[serde(default)]
    pub from: Option<NaiveDate>,
    /// Last included date.
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// Creates a validated range.
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Self, LedgerError> {
        let range = Self { from, to };
        range.validate()?;
        Ok(range)
    }

    /// Unbounded range.
    #[must_use]
    pub const fn all() -> Self {
        Self { from: None, to: None }
    }

    /// Everything up to and including `as_of`.
    #[must_use]
    pub const fn through(as_of: NaiveDate) -> Self {
        Self {
            from: None,
            to: Some(as_of),
        }
    }

    /// Rejects ranges whose start is after their end.
    pub fn validate(&self) -> Result<(), LedgerError> {
        match (self.from, self.to) {
            (Some(from), Some(to)) if from > to => Err(LedgerError::InvalidDateRange { from, to }),
            _ => Ok(()),
        }
    }

    /// Returns true if the date lies inside the range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }

    /// Returns true if the date is before the range start.
    #[must_use]
    pub fn precedes(&self, date: NaiveDate) -> bool {
        self.from.is_some_and(|from| date < from)
    }
}

/// Totals and normal-side balance of one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// The account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Effective statement category.
    pub category: AccountCategory,
    /// Total debit amount.
    pub debit_total: Decimal,
    /// Total credit amount.
    pub credit_total: Decimal,
    /// Balance on the account's normal side.
    pub balance: Decimal,
}

impl AccountBalance {
    /// Creates a zero balance for an account.
    #[must_use]
    pub fn new(account: &Account) -> Self {
        Self {
            account_id: account.id,
            code: account.code.clone(),
            name: account.name.clone(),
            account_type: account.account_type,
            category: account.effective_category(),
            debit_total: Decimal::ZERO,
            credit_total: Decimal::ZERO,
            balance: Decimal::ZERO,
        }
    }

    /// Adds a debit amount.
    pub fn add_debit(&mut self, amount: Decimal) {
        self.debit_total += amount;
        self.recalculate();
    }

    /// Adds a credit amount.
    pub fn add_credit(&mut self, amount: Decimal) {
        self.credit_total += amount;
        self.recalculate();
    }

    fn recalculate(&mut self) {
        self.balance = self
            .account_type
            .normal_balance()
            .balance_change(self.debit_total, self.credit_total);
    }
}

/// Running balance step for a ledger row.
///
/// - previous_balance: balance before this row
/// - current_balance: balance after this row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningBalance {
    /// 1-based position within the ledger.
    pub sequence: u32,
    /// Balance before this row.
    pub previous_balance: Decimal,
    /// Balance after this row.
    pub current_balance: Decimal,
}

impl RunningBalance {
    /// Creates the first step from an opening balance.
    #[must_use]
    pub fn first_entry(opening: Decimal, balance_change: Decimal) -> Self {
        Self {
            sequence: 1,
            previous_balance: opening,
            current_balance: opening + balance_change,
        }
    }

    /// Creates the next step.
    ///
    /// - current_balance[N] = previous_balance[N] + balance_change
    /// - previous_balance[N] = current_balance[N-1]
    #[must_use]
    pub fn next_entry(previous: &Self, balance_change: Decimal) -> Self {
        Self {
            sequence: previous.sequence + 1,
            previous_balance: previous.current_balance,
            current_balance: previous.current_balance + balance_change,
        }
    }
}

/// One row of an account or partner ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRow {
    /// Source entry.
    pub entry_id: JournalEntryId,
    /// Entry date.
    pub date: NaiveDate,
    /// Description.
    pub description: String,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Running balance after this row.
    pub balance: Decimal,
}

/// Running-balance ledger over a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountLedger {
    /// Normal side used for the signs.
    pub normal_balance: NormalBalance,
    /// Balance carried in from lines before the range.
    pub opening_balance: Decimal,
    /// Rows in date order.
    pub rows: Vec<LedgerRow>,
    /// Debit total of the rows.
    pub debit_total: Decimal,
    /// Credit total of the rows.
    pub credit_total: Decimal,
    /// Balance after the last row.
    pub closing_balance: Decimal,
}

/// Computes a running balance over lines.
///
/// Lines are ordered by date ascending, keeping input order for equal
/// dates. Lines before the range fold into the opening balance; lines after
/// it are ignored.
pub fn running_balance(
    lines: &[LedgerLine],
    normal_balance: NormalBalance,
    range: &DateRange,
) -> Result<AccountLedger, LedgerError> {
    range.validate()?;

    let mut ordered: Vec<&LedgerLine> = lines.iter().collect();
    ordered.sort_by_key(|l| l.date);

    let opening_balance: Decimal = ordered
        .iter()
        .filter(|l| range.precedes(l.date))
        .map(|l| normal_balance.balance_change(l.debit, l.credit))
        .sum();

    let mut rows = Vec::new();
    let mut step: Option<RunningBalance> = None;
    let mut debit_total = Decimal::ZERO;
    let mut credit_total = Decimal::ZERO;

    for line in ordered.into_iter().filter(|l| range.contains(l.date)) {
        let change = normal_balance.balance_change(line.debit, line.credit);
        let next = match &step {
            None => RunningBalance::first_entry(opening_balance, change),
            Some(previous) => RunningBalance::next_entry(previous, change),
        };
        debit_total += line.debit;
        credit_total += line.credit;
        rows.push(LedgerRow {
            entry_id: line.entry_id,
            date: line.date,
            description: line.description.clone(),
            debit: line.debit,
            credit: line.credit,
            balance: next.current_balance,
        });
        step = Some(next);
    }

    Ok(AccountLedger {
        normal_balance,
        opening_balance,
        rows,
        debit_total,
        credit_total,
        closing_balance: step.map_or(opening_balance, |s| s.current_balance),
    })
}

/// Computes the running-balance ledger of one account.
pub fn account_ledger(
    account: &Account,
    lines: &[LedgerLine],
    range: &DateRange,
) -> Result<AccountLedger, LedgerError> {
    let own: Vec<LedgerLine> = lines
        .iter()
        .filter(|l| l.account_id == account.id)
        .cloned()
        .collect();
    running_balance(&own, account.account_type.normal_balance(), range)
}

/// Computes the balance of every account over lines within the range.
///
/// Every account appears in the result, in code order, even with no
/// activity.
///
/// # Errors
///
/// Returns `AccountNotFound` if a line references an unknown account.
pub fn account_balances(
    accounts: &[Account],
    lines: &[LedgerLine],
    range: &DateRange,
) -> Result<Vec<AccountBalance>, LedgerError> {
    range.validate()?;

    let mut balances: HashMap<AccountId, AccountBalance> = accounts
        .iter()
        .map(|a| (a.id, AccountBalance::new(a)))
        .collect();

    for line in lines.iter().filter(|l| range.contains(l.date)) {
        let balance = balances
            .get_mut(&line.account_id)
            .ok_or(LedgerError::AccountNotFound(line.account_id))?;
        balance.add_debit(line.debit);
        balance.add_credit(line.credit);
    }

    let mut out: Vec<AccountBalance> = balances.into_values().collect();
    out.sort_by(|a, b| a.code.cmp(&b.code));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use choubo_shared::types::JournalLineId;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, day).unwrap()
    }

    fn line(account_id: AccountId, day: u32, debit: Decimal, credit: Decimal) -> LedgerLine {
        LedgerLine {
            entry_id: JournalEntryId::new(),
            line_id: JournalLineId::new(),
            date: date(day),
            description: format!("day {day}"),
            account_id,
            partner_id: None,
            debit,
            credit,
        }
    }

    /// Strategy for generating balance changes (can be positive or negative)
    fn balance_change_strategy() -> impl Strategy<Value = Decimal> {
        (-100_000i64..100_000i64).prop_map(|n| Decimal::new(n, 0))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// After N lines the running balance equals the sum of the first N
        /// signed amounts, taken in date order.
        #[test]
        fn prop_running_balance_is_prefix_sum(
            raw in prop::collection::vec((1u32..28, balance_change_strategy()), 1..30),
        ) {
            let account = AccountId::new();
            let lines: Vec<LedgerLine> = raw
                .iter()
                .map(|(day, amount)| {
                    if *amount >= Decimal::ZERO {
                        line(account, *day, *amount, Decimal::ZERO)
                    } else {
                        line(account, *day, Decimal::ZERO, -*amount)
                    }
                })
                .collect();

            let ledger = running_balance(&lines, NormalBalance::Debit, &DateRange::all()).unwrap();

            let mut sorted = raw.clone();
            sorted.sort_by_key(|(day, _)| *day);
            let mut expected = Decimal::ZERO;
            for (row, (day, amount)) in ledger.rows.iter().zip(sorted.iter()) {
                expected += *amount;
                prop_assert_eq!(row.date, date(*day));
                prop_assert_eq!(row.balance, expected);
            }
            prop_assert_eq!(ledger.closing_balance, expected);
        }

        /// previous_balance[N] = current_balance[N-1].
        #[test]
        fn prop_previous_equals_prior_current(
            change1 in balance_change_strategy(),
            change2 in balance_change_strategy(),
        ) {
            let rb1 = RunningBalance::first_entry(Decimal::ZERO, change1);
            let rb2 = RunningBalance::next_entry(&rb1, change2);
            prop_assert_eq!(rb2.previous_balance, rb1.current_balance);
            prop_assert_eq!(rb2.sequence, 2);
        }

        /// Credit-normal balances mirror debit-normal ones.
        #[test]
        fn prop_credit_normal_mirrors_debit_normal(
            debit in 0i64..1_000_000,
            credit in 0i64..1_000_000,
        ) {
            let (debit, credit) = (Decimal::from(debit), Decimal::from(credit));
            prop_assert_eq!(
                NormalBalance::Credit.balance_change(debit, credit),
                -NormalBalance::Debit.balance_change(debit, credit)
            );
        }
    }

    #[test]
    fn test_equal_dates_keep_input_order() {
        let account = AccountId::new();
        let lines = vec![
            line(account, 5, dec!(100), Decimal::ZERO),
            line(account, 3, dec!(10), Decimal::ZERO),
            line(account, 5, Decimal::ZERO, dec!(30)),
        ];
        let ledger = running_balance(&lines, NormalBalance::Debit, &DateRange::all()).unwrap();
        let balances: Vec<Decimal> = ledger.rows.iter().map(|r| r.balance).collect();
        assert_eq!(balances, vec![dec!(10), dec!(110), dec!(80)]);
    }

    #[test]
    fn test_opening_balance_and_range() {
        let account = AccountId::new();
        let lines = vec![
            line(account, 1, Decimal::ZERO, dec!(500)),
            line(account, 10, Decimal::ZERO, dec!(200)),
            line(account, 12, dec!(50), Decimal::ZERO),
            line(account, 25, Decimal::ZERO, dec!(999)),
        ];
        let range = DateRange::new(Some(date(10)), Some(date(20))).unwrap();

        let ledger = running_balance(&lines, NormalBalance::Credit, &range).unwrap();

        assert_eq!(ledger.opening_balance, dec!(500));
        assert_eq!(ledger.rows.len(), 2);
        assert_eq!(ledger.rows[0].balance, dec!(700));
        assert_eq!(ledger.rows[1].balance, dec!(650));
        assert_eq!(ledger.closing_balance, dec!(650));
        assert_eq!(ledger.credit_total, dec!(200));
        assert_eq!(ledger.debit_total, dec!(50));
    }

    #[test]
    fn test_empty_ledger_closes_at_opening() {
        let ledger = running_balance(&[], NormalBalance::Debit, &DateRange::all()).unwrap();
        assert!(ledger.rows.is_empty());
        assert_eq!(ledger.closing_balance, Decimal::ZERO);
    }

    #[test]
    fn test_inverted_range_rejected() {
        assert!(matches!(
            DateRange::new(Some(date(20)), Some(date(10))),
            Err(LedgerError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn test_account_balances_use_normal_side() {
        let cash = Account::new("1110", "現金", AccountType::Asset);
        let sales = Account::new("4110", "売上高", AccountType::Revenue);
        let idle = Account::new("5110", "仕入高", AccountType::Expense);
        let lines = vec![
            line(cash.id, 1, dec!(100000), Decimal::ZERO),
            line(sales.id, 1, Decimal::ZERO, dec!(100000)),
        ];

        let balances =
            account_balances(&[sales.clone(), cash.clone(), idle], &lines, &DateRange::all())
                .unwrap();

        assert_eq!(balances.len(), 3);
        assert_eq!(balances[0].code, "1110");
        assert_eq!(balances[0].balance, dec!(100000));
        assert_eq!(balances[1].code, "4110");
        assert_eq!(balances[1].balance, dec!(100000));
        assert_eq!(balances[2].balance, Decimal::ZERO);
    }

    #[test]
    fn test_account_balances_reject_unknown_account() {
        let stray = AccountId::new();
        let lines = vec![line(stray, 1, dec!(1), Decimal::ZERO)];
        assert_eq!(
            account_balances(&[], &lines, &DateRange::all()),
            Err(LedgerError::AccountNotFound(stray))
        );
    }

    #[test]
    fn test_account_ledger_filters_to_account() {
        let cash = Account::new("1110", "現金", AccountType::Asset);
        let other = AccountId::new();
        let lines = vec![
            line(cash.id, 1, dec!(300), Decimal::ZERO),
            line(other, 1, Decimal::ZERO, dec!(300)),
            line(cash.id, 2, Decimal::ZERO, dec!(100)),
        ];
        let ledger = account_ledger(&cash, &lines, &DateRange::all()).unwrap();
        assert_eq!(ledger.rows.len(), 2);
        assert_eq!(ledger.closing_balance, dec!(200));
    }
}
