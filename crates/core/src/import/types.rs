//! Import domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use choubo_shared::types::JournalEntryId;

use crate::ledger::JournalEntry;

/// One parsed row of a bank statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementRow {
    /// 1-based line number in the file.
    pub line: usize,
    /// Transaction date.
    pub date: NaiveDate,
    /// Statement description.
    pub description: String,
    /// Signed amount; negative for money going out.
    pub amount: Decimal,
}

/// A row that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    /// 1-based line number in the file.
    pub line: usize,
    /// Error code.
    pub code: String,
    /// Human readable message.
    pub message: String,
}

/// An already-booked transaction that imported rows are compared against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingTransaction {
    /// Source entry, when known.
    #[serde(default)]
    pub entry_id: Option<JournalEntryId>,
    /// Booking date.
    pub date: NaiveDate,
    /// Description.
    pub description: String,
    /// Amount; compared by absolute value.
    pub amount: Decimal,
}

impl From<&JournalEntry> for ExistingTransaction {
    fn from(entry: &JournalEntry) -> Self {
        Self {
            entry_id: Some(entry.id),
            date: entry.date,
            description: entry.description.clone(),
            amount: entry.total_debit(),
        }
    }
}

/// Converts booked entries into comparison rows, including drafts.
#[must_use]
pub fn existing_transactions(entries: &[JournalEntry]) -> Vec<ExistingTransaction> {
    entries.iter().map(ExistingTransaction::from).collect()
}

/// What to do with an imported row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportAction {
    /// Book the row.
    Import,
    /// Ask the user first.
    Review,
    /// Almost certainly a duplicate.
    Skip,
}

/// Where a likely duplicate was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DuplicateSource {
    /// An already-booked transaction.
    Existing {
        /// The entry, when known.
        entry_id: Option<JournalEntryId>,
        /// Its date.
        date: NaiveDate,
        /// Its description.
        description: String,
    },
    /// An earlier row of the same file.
    Batch {
        /// Line of the earlier row.
        line: usize,
    },
}

/// A likely duplicate of an imported row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateMatch {
    /// The matching transaction.
    pub source: DuplicateSource,
    /// Description similarity in `[0, 1]`.
    pub similarity: Decimal,
    /// Duplicate confidence in `[0, 1]`.
    pub confidence: Decimal,
}

/// Accounts proposed for a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedEntry {
    /// Account code to debit.
    pub debit_account_code: String,
    /// Account code to credit.
    pub credit_account_code: String,
    /// Absolute amount.
    pub amount: Decimal,
    /// Pattern of the rule that matched; `None` for the fallback accounts.
    pub matched_pattern: Option<String>,
    /// Rule confidence, zero for the fallback.
    pub confidence: Decimal,
}

/// One analysed row of the preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewRow {
    /// The parsed row.
    #[serde(flatten)]
    pub row: StatementRow,
    /// Proposed entry.
    pub suggestion: SuggestedEntry,
    /// Best duplicate candidate, if any.
    pub duplicate: Option<DuplicateMatch>,
    /// Recommended action.
    pub action: ImportAction,
}

/// Row counts of a preview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    /// Parsed rows.
    pub total: usize,
    /// Rows marked for import.
    pub to_import: usize,
    /// Rows marked for review.
    pub to_review: usize,
    /// Rows marked as duplicates.
    pub to_skip: usize,
    /// Rows that failed to parse.
    pub errors: usize,
}

/// Result of analysing a statement before anything is booked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportPreview {
    /// Analysed rows in file order.
    pub rows: Vec<PreviewRow>,
    /// Rows that could not be parsed.
    pub errors: Vec<RowError>,
    /// Counts.
    pub summary: ImportSummary,
}

impl ImportPreview {
    /// Builds a preview and its summary.
    #[must_use]
    pub fn new(rows: Vec<PreviewRow>, errors: Vec<RowError>) -> Self {
        let count = |action: ImportAction| rows.iter().filter(|r| r.action == action).count();
        let summary = ImportSummary {
            total: rows.len() + errors.len(),
            to_import: count(ImportAction::Import),
            to_review: count(ImportAction::Review),
            to_skip: count(ImportAction::Skip),
            errors: errors.len(),
        };
        Self {
            rows,
            errors,
            summary,
        }
    }
}
