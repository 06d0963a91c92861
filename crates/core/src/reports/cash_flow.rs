//! Direct-method cash flow.
//!
//! For every entry that moves cash, each non-cash line is the reason for
//! part of the movement: its credit minus debit is cash in. The line's
//! account decides the activity. Transfers between cash accounts net to
//! zero and are skipped.

use std::collections::{BTreeMap, HashMap, HashSet};

use rust_decimal::Decimal;
use choubo_shared::types::{AccountId, JournalEntryId};

use super::error::ReportError;
use super::types::{CashFlowActivity, CashFlowItem, CashFlowReport, CashFlowSection};
use crate::accounts::{Account, AccountCategory};
use crate::ledger::{DateRange, LedgerError, LedgerLine};

/// Activity a counterpart account's cash belongs to.
#[must_use]
pub fn activity_for(account: &Account) -> CashFlowActivity {
    match account.effective_category() {
        AccountCategory::FixedAsset => CashFlowActivity::Investing,
        AccountCategory::LongTermLiability | AccountCategory::Capital => CashFlowActivity::Financing,
        _ => CashFlowActivity::Operating,
    }
}

pub(super) fn cash_flow(
    accounts: &[Account],
    lines: &[LedgerLine],
    range: &DateRange,
    currency: &str,
) -> Result<CashFlowReport, ReportError> {
    range.validate()?;

    let by_id: HashMap<AccountId, &Account> = accounts.iter().map(|a| (a.id, a)).collect();
    let cash: HashSet<AccountId> = accounts.iter().filter(|a| a.is_cash()).map(|a| a.id).collect();

    let mut opening_cash = Decimal::ZERO;
    let mut entries: HashMap<JournalEntryId, Vec<&LedgerLine>> = HashMap::new();
    for line in lines {
        if !by_id.contains_key(&line.account_id) {
            return Err(LedgerError::AccountNotFound(line.account_id).into());
        }
        if range.precedes(line.date) {
            if cash.contains(&line.account_id) {
                opening_cash += line.debit - line.credit;
            }
        } else if range.contains(line.date) {
            entries.entry(line.entry_id).or_default().push(line);
        }
    }

    let mut items: BTreeMap<(CashFlowActivity, String), CashFlowItem> = BTreeMap::new();
    for entry_lines in entries.values() {
        let moved: Decimal = entry_lines
            .iter()
            .filter(|l| cash.contains(&l.account_id))
            .map(|l| l.debit - l.credit)
            .sum();
        if moved.is_zero() {
            continue;
        }
        for line in entry_lines.iter().filter(|l| !cash.contains(&l.account_id)) {
            let Some(account) = by_id.get(&line.account_id) else {
                continue;
            };
            items
                .entry((activity_for(account), account.code.clone()))
                .or_insert_with(|| CashFlowItem {
                    account_id: account.id,
                    code: account.code.clone(),
                    name: account.name.clone(),
                    amount: Decimal::ZERO,
                })
                .amount += line.credit - line.debit;
        }
    }

    let mut operating = CashFlowSection::default();
    let mut investing = CashFlowSection::default();
    let mut financing = CashFlowSection::default();
    for ((activity, _), item) in items {
        let section = match activity {
            CashFlowActivity::Operating => &mut operating,
            CashFlowActivity::Investing => &mut investing,
            CashFlowActivity::Financing => &mut financing,
        };
        section.total += item.amount;
        if !item.amount.is_zero() {
            section.items.push(item);
        }
    }

    let net_change = operating.total + investing.total + financing.total;
    Ok(CashFlowReport {
        from: range.from,
        to: range.to,
        currency: currency.to_string(),
        opening_cash,
        operating,
        investing,
        financing,
        net_change,
        closing_cash: opening_cash + net_change,
    })
}
