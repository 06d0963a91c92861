//! Ledger service for journal entry preparation and status changes.
//!
//! Pure business logic: the caller loads accounts and the period lock, the
//! service decides whether an entry may be stored.

use std::collections::HashMap;

use choubo_shared::types::AccountId;
use choubo_shared::{AppError, AppResult, FieldErrors};

use super::entry::{EntryStatus, JournalEntry};
use super::error::LedgerError;
use super::lifecycle::{PeriodLock, ensure_editable, transition};
use super::validation::{EntryTotals, check_lines};
use crate::accounts::Account;
use crate::schema::{JournalEntryInput, field_errors};

/// Ledger service.
pub struct LedgerService;

impl LedgerService {
    /// Validates an entry form and turns it into a draft entry.
    ///
    /// Every problem is collected into one set of field errors:
    /// 1. Schema rules (dates, description, amounts, tax rates)
    /// 2. Line rules (one side per line, no zero lines, both sides present)
    /// 3. Accounts (exist, active)
    /// 4. Period lock
    /// 5. Balance (debits = credits), only when the lines are otherwise valid
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] with per-field messages.
    pub fn prepare_entry(
        input: JournalEntryInput,
        accounts: &[Account],
        lock: &PeriodLock,
    ) -> AppResult<(JournalEntry, EntryTotals)> {
        let mut errors = field_errors(&input);
        let entry = input.into_entry();

        for error in check_lines(&entry.lines) {
            add_unique(&mut errors, &error);
        }

        let by_id: HashMap<AccountId, &Account> = accounts.iter().map(|a| (a.id, a)).collect();
        for (index, line) in entry.lines.iter().enumerate() {
            let problem = match by_id.get(&line.account_id) {
                None => Some(LedgerError::AccountNotFound(line.account_id)),
                Some(account) if !account.is_active => Some(LedgerError::AccountInactive(account.id)),
                Some(_) => None,
            };
            if let Some(problem) = problem {
                errors.add(format!("lines[{index}].account_id"), problem.user_message());
            }
        }

        if let Err(error) = lock.check(entry.date) {
            add_unique(&mut errors, &error);
        }

        errors.into_result()?;
        let totals = EntryTotals::of(&entry.lines);
        Ok((entry, totals))
    }

    /// Replaces the lines and header of a draft entry with a new form.
    ///
    /// The entry keeps its id and organization whatever the form says.
    ///
    /// # Errors
    ///
    /// Fails when the entry is not editable, its current date is locked, or
    /// the form does not validate.
    pub fn revise_entry(
        existing: &JournalEntry,
        input: JournalEntryInput,
        accounts: &[Account],
        lock: &PeriodLock,
    ) -> AppResult<(JournalEntry, EntryTotals)> {
        ensure_editable(existing, lock)?;
        let (mut entry, totals) = Self::prepare_entry(input, accounts, lock)?;
        entry.id = existing.id;
        entry.organization_id = existing.organization_id;
        Ok((entry, totals))
    }

    /// Checks that an entry may be deleted.
    ///
    /// # Errors
    ///
    /// Fails for non-draft entries and entries in a locked period.
    pub fn ensure_deletable(entry: &JournalEntry, lock: &PeriodLock) -> AppResult<()> {
        ensure_editable(entry, lock).map_err(AppError::from)
    }

    /// Moves an entry to a new status.
    ///
    /// Approval re-checks the balance so a stored unbalanced entry can never
    /// be approved.
    ///
    /// # Errors
    ///
    /// Fails on disallowed transitions, locked periods and unbalanced lines.
    pub fn change_status(
        mut entry: JournalEntry,
        to: EntryStatus,
        lock: &PeriodLock,
    ) -> AppResult<JournalEntry> {
        if to == EntryStatus::Approved {
            if let Some(error) = check_lines(&entry.lines).into_iter().next() {
                return Err(error.into());
            }
        }
        transition(&mut entry, to, lock)?;
        Ok(entry)
    }
}

fn add_unique(errors: &mut FieldErrors, error: &LedgerError) {
    let field = error.field();
    let message = error.user_message();
    if !errors.get(&field).is_some_and(|m| m.iter().any(|x| x == message)) {
        errors.add(field, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::{AccountCategory, AccountType};
    use crate::schema::JournalLineInput;
    use chrono::NaiveDate;
    use choubo_shared::types::OrganizationId;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn accounts() -> Vec<Account> {
        vec![
            Account::new("1110", "現金", AccountType::Asset).with_category(AccountCategory::CashAndDeposits),
            Account::new("4110", "売上高", AccountType::Revenue),
        ]
    }

    fn line(account_id: AccountId, debit: Decimal, credit: Decimal) -> JournalLineInput {
        JournalLineInput {
            account_id,
            partner_id: None,
            debit,
            credit,
            tax_rate: None,
            tax_amount: None,
            memo: None,
        }
    }

    fn input(accounts: &[Account], debit: Decimal, credit: Decimal) -> JournalEntryInput {
        JournalEntryInput {
            organization_id: OrganizationId::new(),
            date: NaiveDate::from_ymd_opt(2024, 4, 10).unwrap(),
            description: "現金売上".into(),
            lines: vec![
                line(accounts[0].id, debit, Decimal::ZERO),
                line(accounts[1].id, Decimal::ZERO, credit),
            ],
        }
    }

    #[test]
    fn test_cash_sale_is_accepted() {
        let accounts = accounts();
        let (entry, totals) =
            LedgerService::prepare_entry(input(&accounts, dec!(100000), dec!(100000)), &accounts, &PeriodLock::open())
                .unwrap();
        assert_eq!(entry.status, EntryStatus::Draft);
        assert_eq!(totals.debit, dec!(100000));
        assert!(totals.is_balanced);
    }

    #[test]
    fn test_unbalanced_entry_reports_lines_field() {
        let accounts = accounts();
        let err = LedgerService::prepare_entry(input(&accounts, dec!(100), dec!(50)), &accounts, &PeriodLock::open())
            .unwrap_err();
        let fields = err.field_errors().unwrap();
        assert_eq!(
            fields.get("lines"),
            Some(&["Debit and credit totals must match".to_string()][..])
        );
    }

    #[test]
    fn test_schema_and_ledger_errors_are_merged() {
        let accounts = accounts();
        let mut form = input(&accounts, dec!(100), dec!(100));
        form.description = String::new();
        form.lines[1].account_id = AccountId::new();
        let lock = PeriodLock::through(NaiveDate::from_ymd_opt(2024, 4, 30).unwrap());

        let err = LedgerService::prepare_entry(form, &accounts, &lock).unwrap_err();
        let fields = err.field_errors().unwrap();
        assert!(fields.contains("description"));
        assert!(fields.contains("lines[1].account_id"));
        assert!(fields.contains("date"));
    }

    #[test]
    fn test_inactive_account_rejected() {
        let mut accounts = accounts();
        accounts[1].is_active = false;
        let err = LedgerService::prepare_entry(input(&accounts, dec!(1), dec!(1)), &accounts, &PeriodLock::open())
            .unwrap_err();
        assert_eq!(
            err.field_errors().unwrap().get("lines[1].account_id"),
            Some(&["The selected account is inactive".to_string()][..])
        );
    }

    #[test]
    fn test_revise_keeps_id_and_requires_draft() {
        let accounts = accounts();
        let lock = PeriodLock::open();
        let (entry, _) = LedgerService::prepare_entry(input(&accounts, dec!(1), dec!(1)), &accounts, &lock).unwrap();

        let (revised, totals) =
            LedgerService::revise_entry(&entry, input(&accounts, dec!(2), dec!(2)), &accounts, &lock).unwrap();
        assert_eq!(revised.id, entry.id);
        assert_eq!(totals.credit, dec!(2));

        let approved = LedgerService::change_status(entry, EntryStatus::Approved, &lock).unwrap();
        assert!(LedgerService::revise_entry(&approved, input(&accounts, dec!(2), dec!(2)), &accounts, &lock).is_err());
        assert!(LedgerService::ensure_deletable(&approved, &lock).is_err());
    }

    #[test]
    fn test_revise_cannot_move_entry_to_another_organization() {
        let accounts = accounts();
        let lock = PeriodLock::open();
        let (entry, _) = LedgerService::prepare_entry(input(&accounts, dec!(1), dec!(1)), &accounts, &lock).unwrap();

        let mut other = input(&accounts, dec!(3), dec!(3));
        other.organization_id = OrganizationId::new();
        let (revised, _) = LedgerService::revise_entry(&entry, other, &accounts, &lock).unwrap();

        assert_eq!(revised.id, entry.id);
        assert_eq!(revised.organization_id, entry.organization_id);
    }

    #[test]
    fn test_cannot_approve_unbalanced_entry() {
        let accounts = accounts();
        let mut entry = input(&accounts, dec!(1), dec!(1)).into_entry();
        entry.lines[0].debit = dec!(2);
        assert!(LedgerService::change_status(entry, EntryStatus::Approved, &PeriodLock::open()).is_err());
    }
}
