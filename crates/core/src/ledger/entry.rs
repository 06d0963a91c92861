//! Journal entry domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use choubo_shared::types::{AccountId, JournalEntryId, JournalLineId, OrganizationId, PartnerId};

/// Journal entry status.
///
/// Entries are created as drafts, approved, then locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Being drafted; may be edited or deleted.
    Draft,
    /// Approved; counts in reports.
    Approved,
    /// Locked; immutable.
    Locked,
}

impl EntryStatus {
    /// Returns true if the entry can be modified.
    #[must_use]
    pub const fn is_editable(self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if the entry is immutable.
    #[must_use]
    pub const fn is_immutable(self) -> bool {
        matches!(self, Self::Locked)
    }

    /// Returns true if moving to `next` is allowed.
    ///
    /// draft → approved, approved → draft, approved → locked.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Draft, Self::Approved) | (Self::Approved, Self::Draft | Self::Locked)
        )
    }
}

/// A single line of a journal entry.
///
/// Exactly one of `debit` and `credit` is positive; the other is zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLine {
    /// Line ID.
    #[serde(default)]
    pub id: JournalLineId,
    /// The account posted to.
    pub account_id: AccountId,
    /// Counterparty, if any.
    #[serde(default)]
    pub partner_id: Option<PartnerId>,
    /// Debit amount.
    #[serde(default)]
    pub debit: Decimal,
    /// Credit amount.
    #[serde(default)]
    pub credit: Decimal,
    /// Consumption tax rate in percent (e.g. 10, 8).
    #[serde(default)]
    pub tax_rate: Option<Decimal>,
    /// Consumption tax included in the amount.
    #[serde(default)]
    pub tax_amount: Option<Decimal>,
    /// Line memo.
    #[serde(default)]
    pub memo: Option<String>,
}

impl JournalLine {
    /// Creates a debit line.
    #[must_use]
    pub fn debit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            id: JournalLineId::new(),
            account_id,
            partner_id: None,
            debit: amount,
            credit: Decimal::ZERO,
            tax_rate: None,
            tax_amount: None,
            memo: None,
        }
    }

    /// Creates a credit line.
    #[must_use]
    pub fn credit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            debit: Decimal::ZERO,
            credit: amount,
            ..Self::debit(account_id, Decimal::ZERO)
        }
    }

    /// Attaches a partner.
    #[must_use]
    pub fn with_partner(mut self, partner_id: PartnerId) -> Self {
        self.partner_id = Some(partner_id);
        self
    }

    /// Returns debit minus credit.
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        self.debit - self.credit
    }
}

/// A double-entry journal entry (仕訳).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Entry ID.
    #[serde(default)]
    pub id: JournalEntryId,
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Entry date.
    pub date: NaiveDate,
    /// Description (摘要).
    pub description: String,
    /// Workflow status.
    pub status: EntryStatus,
    /// Lines; debits must equal credits.
    pub lines: Vec<JournalLine>,
}

impl JournalEntry {
    /// Sum of debit amounts.
    #[must_use]
    pub fn total_debit(&self) -> Decimal {
        self.lines.iter().map(|l| l.debit).sum()
    }

    /// Sum of credit amounts.
    #[must_use]
    pub fn total_credit(&self) -> Decimal {
        self.lines.iter().map(|l| l.credit).sum()
    }

    /// Returns true if debits equal credits.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.total_debit() == self.total_credit()
    }

    /// Flattens the entry into dated ledger lines.
    pub fn ledger_lines(&self) -> impl Iterator<Item = LedgerLine> + '_ {
        self.lines.iter().map(|line| LedgerLine {
            entry_id: self.id,
            line_id: line.id,
            date: self.date,
            description: line
                .memo
                .clone()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| self.description.clone()),
            account_id: line.account_id,
            partner_id: line.partner_id,
            debit: line.debit,
            credit: line.credit,
        })
    }
}

/// A journal line together with its entry's date and description.
///
/// This is the row shape balance and report computations work on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerLine {
    /// Owning entry.
    pub entry_id: JournalEntryId,
    /// Line ID.
    pub line_id: JournalLineId,
    /// Entry date.
    pub date: NaiveDate,
    /// Line memo, or the entry description when the memo is blank.
    pub description: String,
    /// Account posted to.
    pub account_id: AccountId,
    /// Counterparty.
    pub partner_id: Option<PartnerId>,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
}

/// Flattens entries into ledger lines.
///
/// Drafts are left out unless `include_drafts` is set.
pub fn ledger_lines(entries: &[JournalEntry], include_drafts: bool) -> Vec<LedgerLine> {
    entries
        .iter()
        .filter(|e| include_drafts || e.status != EntryStatus::Draft)
        .flat_map(JournalEntry::ledger_lines)
        .collect()
}
