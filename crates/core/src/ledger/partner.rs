//! Partner receivable / payable balances.
//!
//! A partner's receivable is the debit-minus-credit total of its lines on
//! receivable accounts; its payable is the credit-minus-debit total on
//! payable accounts. Which accounts count is decided by account code.

use std::collections::{BTreeMap, HashSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use choubo_shared::types::{AccountId, PartnerId};

use crate::accounts::Account;

use super::balance::{AccountLedger, DateRange, NormalBalance, running_balance};
use super::entry::LedgerLine;
use super::error::LedgerError;

/// The receivable and payable accounts of an organization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartnerAccounts {
    receivable: HashSet<AccountId>,
    payable: HashSet<AccountId>,
}

impl PartnerAccounts {
    /// Resolves account codes against the chart of accounts.
    ///
    /// Codes with no matching account are skipped, so an organization
    /// without receivable or payable accounts simply resolves to empty sets.
    #[must_use]
    pub fn resolve(
        accounts: &[Account],
        receivable_codes: &[String],
        payable_codes: &[String],
    ) -> Self {
        let ids_for = |codes: &[String]| -> HashSet<AccountId> {
            accounts
                .iter()
                .filter(|a| codes.iter().any(|c| c == &a.code))
                .map(|a| a.id)
                .collect()
        };
        Self {
            receivable: ids_for(receivable_codes),
            payable: ids_for(payable_codes),
        }
    }

    /// Returns true if the account counts as a receivable.
    #[must_use]
    pub fn is_receivable(&self, id: AccountId) -> bool {
        self.receivable.contains(&id)
    }

    /// Returns true if the account counts as a payable.
    #[must_use]
    pub fn is_payable(&self, id: AccountId) -> bool {
        self.payable.contains(&id)
    }

    /// Returns true if neither set has accounts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.receivable.is_empty() && self.payable.is_empty()
    }
}

/// Outstanding balances with one partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerBalance {
    /// The partner.
    pub partner_id: PartnerId,
    /// Amount the partner owes us.
    pub receivable: Decimal,
    /// Amount we owe the partner.
    pub payable: Decimal,
    /// receivable - payable.
    pub net: Decimal,
}

impl PartnerBalance {
    fn zero(partner_id: PartnerId) -> Self {
        Self {
            partner_id,
            receivable: Decimal::ZERO,
            payable: Decimal::ZERO,
            net: Decimal::ZERO,
        }
    }

    fn apply(&mut self, accounts: &PartnerAccounts, line: &LedgerLine) {
        if accounts.is_receivable(line.account_id) {
            self.receivable += line.debit - line.credit;
        }
        if accounts.is_payable(line.account_id) {
            self.payable += line.credit - line.debit;
        }
        self.net = self.receivable - self.payable;
    }
}

/// Computes the balance of every partner appearing on the lines, in id order.
///
/// Partners whose lines touch no receivable or payable account report zero.
#[must_use]
pub fn partner_balances(
    lines: &[LedgerLine],
    accounts: &PartnerAccounts,
    range: &DateRange,
) -> Vec<PartnerBalance> {
    let mut by_partner: BTreeMap<PartnerId, PartnerBalance> = BTreeMap::new();
    for line in lines.iter().filter(|l| range.contains(l.date)) {
        if let Some(partner_id) = line.partner_id {
            by_partner
                .entry(partner_id)
                .or_insert_with(|| PartnerBalance::zero(partner_id))
                .apply(accounts, line);
        }
    }
    by_partner.into_values().collect()
}

/// Computes the balance of one partner; zero when it has no lines.
#[must_use]
pub fn partner_balance(
    partner_id: PartnerId,
    lines: &[LedgerLine],
    accounts: &PartnerAccounts,
    range: &DateRange,
) -> PartnerBalance {
    let mut balance = PartnerBalance::zero(partner_id);
    for line in lines
        .iter()
        .filter(|l| l.partner_id == Some(partner_id) && range.contains(l.date))
    {
        balance.apply(accounts, line);
    }
    balance
}

/// Running ledger of a partner's receivable and payable lines.
///
/// Signed receivable-positive. Lines before `range.from` fold into the
/// opening balance, so the closing balance is the partner's net balance
/// through `range.to`. It matches [`partner_balance`] only for a range
/// without a start date, since that function skips earlier lines.
pub fn partner_ledger(
    partner_id: PartnerId,
    lines: &[LedgerLine],
    accounts: &PartnerAccounts,
    range: &DateRange,
) -> Result<AccountLedger, LedgerError> {
    let own: Vec<LedgerLine> = lines
        .iter()
        .filter(|l| {
            l.partner_id == Some(partner_id)
                && (accounts.is_receivable(l.account_id) || accounts.is_payable(l.account_id))
        })
        .cloned()
        .collect();
    running_balance(&own, NormalBalance::Debit, range)
}
