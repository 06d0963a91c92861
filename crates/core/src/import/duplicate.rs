//! Duplicate detection for imported rows.
//!
//! Heuristic: rows are compared with booked transactions within a few days
//! and with earlier rows of the same file. False positives and negatives are
//! expected; the resulting action only decides whether the user is asked.

use std::collections::HashSet;

use rust_decimal::Decimal;

use choubo_shared::ImportConfig;

use super::types::{DuplicateMatch, DuplicateSource, ExistingTransaction, ImportAction, StatementRow};

/// Score of a description that contains the other one.
pub const CONTAINMENT_SIMILARITY: Decimal = Decimal::from_parts(8, 0, 0, false, 1);

const HALF: Decimal = Decimal::from_parts(5, 0, 0, false, 1);
const QUARTER: Decimal = Decimal::from_parts(25, 0, 0, false, 2);
const TOLERATED_AMOUNT_SCORE: Decimal = Decimal::from_parts(9, 0, 0, false, 1);

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Description similarity in `[0, 1]`.
///
/// Equal descriptions score 1 and an empty one scores 0. When one contains
/// the other the score is 0.8; otherwise it is the number of shared words
/// over the word count of the longer description.
#[must_use]
pub fn similarity(a: &str, b: &str) -> Decimal {
    let (a, b) = (normalize(a), normalize(b));
    if a.is_empty() || b.is_empty() {
        return Decimal::ZERO;
    }
    if a == b {
        return Decimal::ONE;
    }
    if a.contains(&b) || b.contains(&a) {
        return CONTAINMENT_SIMILARITY;
    }

    let words_a: HashSet<&str> = a.split_whitespace().collect();
    let words_b: HashSet<&str> = b.split_whitespace().collect();
    let longest = words_a.len().max(words_b.len());
    if longest == 0 {
        return Decimal::ZERO;
    }
    let common = words_a.intersection(&words_b).count();
    Decimal::from(common) / Decimal::from(longest)
}

/// Confidence that a row duplicates a booked transaction.
///
/// Half similarity, a quarter date closeness (1 on the same day, 0.5
/// otherwise) and a quarter amount closeness (1 when exact, 0.9 within
/// tolerance).
#[must_use]
pub fn existing_confidence(similarity: Decimal, same_day: bool, exact_amount: bool) -> Decimal {
    let date_score = if same_day { Decimal::ONE } else { HALF };
    let amount_score = if exact_amount {
        Decimal::ONE
    } else {
        TOLERATED_AMOUNT_SCORE
    };
    HALF * similarity + QUARTER * date_score + QUARTER * amount_score
}

/// Maps a duplicate confidence to an action.
#[must_use]
pub fn action_for(confidence: Decimal, config: &ImportConfig) -> ImportAction {
    if confidence >= config.skip_confidence {
        ImportAction::Skip
    } else if confidence >= config.review_confidence {
        ImportAction::Review
    } else {
        ImportAction::Import
    }
}

/// Finds likely duplicates using the import thresholds.
#[derive(Debug, Clone, Copy)]
pub struct DuplicateDetector<'a> {
    config: &'a ImportConfig,
}

impl<'a> DuplicateDetector<'a> {
    /// Creates a detector.
    #[must_use]
    pub const fn new(config: &'a ImportConfig) -> Self {
        Self { config }
    }

    /// Best match among booked transactions.
    ///
    /// A transaction matches when it is within the date window, its amount is
    /// within tolerance and the similarity exceeds the match threshold.
    #[must_use]
    pub fn against_existing(
        &self,
        row: &StatementRow,
        existing: &[ExistingTransaction],
    ) -> Option<DuplicateMatch> {
        let amount = row.amount.abs();
        existing
            .iter()
            .filter_map(|tx| {
                let days = (tx.date - row.date).num_days().abs();
                if days > self.config.window_days {
                    return None;
                }
                let difference = (tx.amount.abs() - amount).abs();
                if difference > self.config.amount_tolerance {
                    return None;
                }
                let similarity = similarity(&row.description, &tx.description);
                if similarity <= self.config.match_similarity {
                    return None;
                }
                Some(DuplicateMatch {
                    source: DuplicateSource::Existing {
                        entry_id: tx.entry_id,
                        date: tx.date,
                        description: tx.description.clone(),
                    },
                    similarity,
                    confidence: existing_confidence(similarity, days == 0, difference.is_zero()),
                })
            })
            .fold(None, keep_best)
    }

    /// Best match among earlier rows of the same file.
    ///
    /// Same day, exact amount and similarity above the batch threshold; the
    /// confidence is the similarity itself.
    #[must_use]
    pub fn within_batch(&self, row: &StatementRow, earlier: &[StatementRow]) -> Option<DuplicateMatch> {
        earlier
            .iter()
            .filter(|other| other.date == row.date && other.amount == row.amount)
            .filter_map(|other| {
                let similarity = similarity(&row.description, &other.description);
                (similarity > self.config.batch_similarity).then(|| DuplicateMatch {
                    source: DuplicateSource::Batch { line: other.line },
                    similarity,
                    confidence: similarity,
                })
            })
            .fold(None, keep_best)
    }

    /// Best match from either source.
    #[must_use]
    pub fn detect(
        &self,
        row: &StatementRow,
        earlier: &[StatementRow],
        existing: &[ExistingTransaction],
    ) -> Option<DuplicateMatch> {
        let from_existing = self.against_existing(row, existing);
        let from_batch = self.within_batch(row, earlier);
        [from_existing, from_batch].into_iter().flatten().fold(None, keep_best)
    }
}

fn keep_best(best: Option<DuplicateMatch>, candidate: DuplicateMatch) -> Option<DuplicateMatch> {
    match best {
        Some(current) if current.confidence >= candidate.confidence => Some(current),
        _ => Some(candidate),
    }
}
