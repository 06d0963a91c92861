//! Property-based tests for `LedgerService`.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;
use choubo_shared::types::OrganizationId;

use super::lifecycle::PeriodLock;
use super::service::LedgerService;
use crate::accounts::{Account, AccountType};
use crate::schema::{JournalEntryInput, JournalLineInput};

/// Strategy to generate amounts with at most 2 decimal places.
fn amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn line(account: &Account, debit: Decimal, credit: Decimal) -> JournalLineInput {
    JournalLineInput {
        account_id: account.id,
        partner_id: None,
        debit,
        credit,
        tax_rate: None,
        tax_amount: None,
        memo: None,
    }
}

fn form(accounts: &[Account], debit: Decimal, credit: Decimal, date: NaiveDate) -> JournalEntryInput {
    JournalEntryInput {
        organization_id: OrganizationId::new(),
        date,
        description: "test".into(),
        lines: vec![
            line(&accounts[0], debit, Decimal::ZERO),
            line(&accounts[1], Decimal::ZERO, credit),
        ],
    }
}

fn accounts() -> Vec<Account> {
    vec![
        Account::new("1110", "現金", AccountType::Asset),
        Account::new("4110", "売上高", AccountType::Revenue),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// An entry is accepted exactly when its debits equal its credits.
    #[test]
    fn prop_accepted_iff_balanced(debit in amount(), credit in amount()) {
        let accounts = accounts();
        let date = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let result = LedgerService::prepare_entry(form(&accounts, debit, credit, date), &accounts, &PeriodLock::open());

        prop_assert_eq!(result.is_ok(), debit == credit);
        if let Ok((entry, totals)) = result {
            prop_assert_eq!(entry.total_debit(), entry.total_credit());
            prop_assert!(totals.is_balanced);
        }
    }

    /// Entries dated on or before the lock are rejected on the date field.
    #[test]
    fn prop_locked_dates_rejected(amount in amount(), offset in -30i64..30) {
        let accounts = accounts();
        let locked = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let date = locked + Duration::days(offset);
        let result = LedgerService::prepare_entry(
            form(&accounts, amount, amount, date),
            &accounts,
            &PeriodLock::through(locked),
        );

        match result {
            Ok(_) => prop_assert!(offset > 0),
            Err(error) => {
                prop_assert!(offset <= 0);
                prop_assert!(error.field_errors().is_some_and(|f| f.contains("date")));
            }
        }
    }
}
