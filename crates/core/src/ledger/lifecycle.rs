//! Entry status transitions and period locks.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::entry::{EntryStatus, JournalEntry};
use super::error::LedgerError;

/// An organization's closing lock (締め).
///
/// Entries dated on or before `locked_through` cannot be posted, edited or
/// deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodLock {
    /// Last locked date, if any.
    #[serde(default)]
    pub locked_through: Option<NaiveDate>,
}

impl PeriodLock {
    /// No lock.
    #[must_use]
    pub const fn open() -> Self {
        Self {
            locked_through: None,
        }
    }

    /// Locks everything up to and including `date`.
    #[must_use]
    pub const fn through(date: NaiveDate) -> Self {
        Self {
            locked_through: Some(date),
        }
    }

    /// Returns true if postings on `date` are allowed.
    #[must_use]
    pub fn allows_posting(&self, date: NaiveDate) -> bool {
        self.locked_through.is_none_or(|locked| date > locked)
    }

    /// Rejects postings on locked dates.
    pub fn check(&self, date: NaiveDate) -> Result<(), LedgerError> {
        match self.locked_through {
            Some(locked_through) if date <= locked_through => Err(LedgerError::PeriodLocked {
                date,
                locked_through,
            }),
            _ => Ok(()),
        }
    }
}

/// Ensures an entry may be edited or deleted.
pub fn ensure_editable(entry: &JournalEntry, lock: &PeriodLock) -> Result<(), LedgerError> {
    if !entry.status.is_editable() {
        return Err(LedgerError::NotEditable);
    }
    lock.check(entry.date)
}

/// Moves an entry to a new status.
///
/// Approving or un-approving requires the entry's date to be outside the
/// locked period; locking does not, since closing a period locks its entries.
pub fn transition(
    entry: &mut JournalEntry,
    to: EntryStatus,
    lock: &PeriodLock,
) -> Result<(), LedgerError> {
    let from = entry.status;
    if !from.can_transition_to(to) {
        return Err(LedgerError::InvalidStatusTransition { from, to });
    }
    if to != EntryStatus::Locked {
        lock.check(entry.date)?;
    }
    entry.status = to;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use choubo_shared::types::{AccountId, JournalEntryId, OrganizationId};
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    use crate::ledger::entry::JournalLine;

    fn entry(status: EntryStatus, date: NaiveDate) -> JournalEntry {
        let account = AccountId::new();
        JournalEntry {
            id: JournalEntryId::new(),
            organization_id: OrganizationId::new(),
            date,
            description: "test".into(),
            status,
            lines: vec![
                JournalLine::debit(account, dec!(1)),
                JournalLine::credit(account, dec!(1)),
            ],
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn status_strategy() -> impl Strategy<Value = EntryStatus> {
        prop_oneof![
            Just(EntryStatus::Draft),
            Just(EntryStatus::Approved),
            Just(EntryStatus::Locked),
        ]
    }

    proptest! {
        /// Locked entries never change status.
        #[test]
        fn prop_locked_is_terminal(to in status_strategy()) {
            let mut e = entry(EntryStatus::Locked, ymd(2024, 6, 1));
            prop_assert!(transition(&mut e, to, &PeriodLock::open()).is_err());
            prop_assert_eq!(e.status, EntryStatus::Locked);
        }

        /// A lock allows exactly the dates after it.
        #[test]
        fn prop_lock_boundary(offset in -400i64..400) {
            let locked = ymd(2024, 3, 31);
            let date = locked + chrono::Duration::days(offset);
            let lock = PeriodLock::through(locked);
            prop_assert_eq!(lock.allows_posting(date), offset > 0);
            prop_assert_eq!(lock.check(date).is_ok(), offset > 0);
        }
    }

    #[test]
    fn test_open_lock_allows_everything() {
        assert!(PeriodLock::open().allows_posting(ymd(1999, 1, 1)));
    }

    #[test]
    fn test_approve_then_lock() {
        let mut e = entry(EntryStatus::Draft, ymd(2024, 6, 1));
        transition(&mut e, EntryStatus::Approved, &PeriodLock::open()).unwrap();
        transition(&mut e, EntryStatus::Locked, &PeriodLock::through(ymd(2024, 6, 30))).unwrap();
        assert_eq!(e.status, EntryStatus::Locked);
    }

    #[test]
    fn test_cannot_approve_in_locked_period() {
        let mut e = entry(EntryStatus::Draft, ymd(2024, 3, 15));
        let result = transition(&mut e, EntryStatus::Approved, &PeriodLock::through(ymd(2024, 3, 31)));
        assert!(matches!(result, Err(LedgerError::PeriodLocked { .. })));
        assert_eq!(e.status, EntryStatus::Draft);
    }

    #[test]
    fn test_draft_cannot_skip_to_locked() {
        let mut e = entry(EntryStatus::Draft, ymd(2024, 6, 1));
        assert_eq!(
            transition(&mut e, EntryStatus::Locked, &PeriodLock::open()),
            Err(LedgerError::InvalidStatusTransition {
                from: EntryStatus::Draft,
                to: EntryStatus::Locked,
            })
        );
    }

    #[test]
    fn test_ensure_editable() {
        let lock = PeriodLock::through(ymd(2024, 3, 31));
        assert!(ensure_editable(&entry(EntryStatus::Draft, ymd(2024, 4, 1)), &lock).is_ok());
        assert_eq!(
            ensure_editable(&entry(EntryStatus::Approved, ymd(2024, 4, 1)), &lock),
            Err(LedgerError::NotEditable)
        );
        assert!(matches!(
            ensure_editable(&entry(EntryStatus::Draft, ymd(2024, 3, 31)), &lock),
            Err(LedgerError::PeriodLocked { .. })
        ));
    }
}
