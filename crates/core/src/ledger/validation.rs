//! Double-entry validation rules.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::entry::JournalLine;
use super::error::LedgerError;

/// Debit and credit totals of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryTotals {
    /// Total debit amount.
    pub debit: Decimal,
    /// Total credit amount.
    pub credit: Decimal,
    /// Whether debits equal credits.
    pub is_balanced: bool,
}

impl EntryTotals {
    /// Creates totals from debit and credit sums.
    #[must_use]
    pub fn new(debit: Decimal, credit: Decimal) -> Self {
        Self {
            debit,
            credit,
            is_balanced: debit == credit,
        }
    }

    /// Sums the lines.
    #[must_use]
    pub fn of(lines: &[JournalLine]) -> Self {
        Self::new(
            lines.iter().map(|l| l.debit).sum(),
            lines.iter().map(|l| l.credit).sum(),
        )
    }

    /// Returns debits minus credits.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.debit - self.credit
    }
}

/// Collects every rule violation in a set of lines.
///
/// Line-level problems are reported per line; entry-level problems
/// (too few lines, single-sided, unbalanced) follow. The balance check only
/// runs when every line is individually valid.
#[must_use]
pub fn check_lines(lines: &[JournalLine]) -> Vec<LedgerError> {
    let mut errors = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        if line.debit < Decimal::ZERO || line.credit < Decimal::ZERO {
            errors.push(LedgerError::NegativeAmount(index));
        } else if line.debit > Decimal::ZERO && line.credit > Decimal::ZERO {
            errors.push(LedgerError::BothSides(index));
        } else if line.debit.is_zero() && line.credit.is_zero() {
            errors.push(LedgerError::ZeroAmount(index));
        }
    }

    if lines.len() < 2 {
        errors.push(LedgerError::InsufficientLines);
        return errors;
    }

    let has_debit = lines.iter().any(|l| l.debit > Decimal::ZERO);
    let has_credit = lines.iter().any(|l| l.credit > Decimal::ZERO);
    if !has_debit || !has_credit {
        errors.push(LedgerError::SingleSided);
    }

    if errors.is_empty() {
        let totals = EntryTotals::of(lines);
        if !totals.is_balanced {
            errors.push(LedgerError::Unbalanced {
                debit: totals.debit,
                credit: totals.credit,
            });
        }
    }

    errors
}

/// Validates that a set of lines forms a balanced double entry.
///
/// # Errors
///
/// Returns the first rule violation found by [`check_lines`].
pub fn validate_lines(lines: &[JournalLine]) -> Result<EntryTotals, LedgerError> {
    match check_lines(lines).into_iter().next() {
        Some(error) => Err(error),
        None => Ok(EntryTotals::of(lines)),
    }
}
