//! Property-based tests for journal line validation rules.

use proptest::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};
use choubo_shared::types::AccountId;

use super::entry::JournalLine;
use super::error::LedgerError;
use super::validation::{check_lines, validate_lines};

/// Strategy to generate a valid positive amount (0.01 to 1,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a negative amount.
fn negative_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(-cents, 2))
}

/// Splits `total` into `parts` amounts summing to `total`.
fn split(total: Decimal, parts: usize) -> Vec<Decimal> {
    let parts = parts.max(1);
    let share = (total / Decimal::from(parts)).round_dp_with_strategy(2, RoundingStrategy::ToZero);
    let mut amounts = vec![share; parts - 1];
    amounts.push(total - share * Decimal::from(parts - 1));
    amounts
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A line with no amount is rejected.
    #[test]
    fn prop_zero_amount_rejected(other in positive_amount()) {
        let lines = vec![
            JournalLine::debit(AccountId::new(), other),
            JournalLine::credit(AccountId::new(), other),
            JournalLine::debit(AccountId::new(), Decimal::ZERO),
        ];
        prop_assert!(check_lines(&lines).contains(&LedgerError::ZeroAmount(2)));
    }

    /// A negative amount is rejected on either side.
    #[test]
    fn prop_negative_amount_rejected(amount in negative_amount(), debit_side in any::<bool>()) {
        let account = AccountId::new();
        let bad = if debit_side {
            JournalLine::debit(account, amount)
        } else {
            JournalLine::credit(account, amount)
        };
        let lines = vec![bad, JournalLine::credit(AccountId::new(), amount.abs())];
        prop_assert!(check_lines(&lines).contains(&LedgerError::NegativeAmount(0)));
    }

    /// One debit split across any number of credits balances.
    #[test]
    fn prop_split_entry_balances(total in positive_amount(), parts in 1usize..6) {
        let mut lines = vec![JournalLine::debit(AccountId::new(), total)];
        for amount in split(total, parts) {
            if amount > Decimal::ZERO {
                lines.push(JournalLine::credit(AccountId::new(), amount));
            }
        }
        prop_assume!(lines.len() >= 2);
        let totals = validate_lines(&lines).unwrap();
        prop_assert_eq!(totals.debit, totals.credit);
    }

    /// Accepted lines always have equal debit and credit totals.
    #[test]
    fn prop_accepted_lines_balance(
        debits in prop::collection::vec(positive_amount(), 1..5),
        credits in prop::collection::vec(positive_amount(), 1..5),
    ) {
        let lines: Vec<JournalLine> = debits
            .iter()
            .map(|d| JournalLine::debit(AccountId::new(), *d))
            .chain(credits.iter().map(|c| JournalLine::credit(AccountId::new(), *c)))
            .collect();
        let debit: Decimal = debits.iter().sum();
        let credit: Decimal = credits.iter().sum();

        match validate_lines(&lines) {
            Ok(totals) => {
                prop_assert_eq!(totals.debit, totals.credit);
                prop_assert_eq!(debit, credit);
            }
            Err(error) => {
                prop_assert_ne!(debit, credit);
                prop_assert_eq!(error, LedgerError::Unbalanced { debit, credit });
            }
        }
    }

    /// Only debits or only credits is single-sided.
    #[test]
    fn prop_single_sided_rejected(a in positive_amount(), b in positive_amount()) {
        let lines = vec![
            JournalLine::credit(AccountId::new(), a),
            JournalLine::credit(AccountId::new(), b),
        ];
        prop_assert_eq!(validate_lines(&lines), Err(LedgerError::SingleSided));
    }
}
