//! Statement import analysis.

use choubo_shared::ImportConfig;

use super::duplicate::{DuplicateDetector, action_for};
use super::error::ImportError;
use super::parser::parse_statement;
use super::rules::{MappingRule, RuleSet};
use super::types::{ExistingTransaction, ImportAction, ImportPreview, PreviewRow, RowError};

/// Import service.
pub struct ImportService;

impl ImportService {
    /// Parses a statement and proposes an entry and action for every row.
    ///
    /// Nothing is booked; the caller decides what to do with the preview.
    ///
    /// # Errors
    ///
    /// Fails when the statement cannot be read at all or a rule pattern is
    /// invalid. Individual bad rows end up in [`ImportPreview::errors`].
    pub fn analyze(
        csv: &str,
        rules: &[MappingRule],
        existing: &[ExistingTransaction],
        config: &ImportConfig,
    ) -> Result<ImportPreview, ImportError> {
        let rules = RuleSet::compile(rules)?;
        let parsed = parse_statement(csv)?;
        let detector = DuplicateDetector::new(config);

        let rows = parsed
            .rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let duplicate = detector.detect(row, &parsed.rows[..index], existing);
                let action = duplicate
                    .as_ref()
                    .map_or(ImportAction::Import, |d| action_for(d.confidence, config));
                PreviewRow {
                    row: row.clone(),
                    suggestion: rules.suggest(row, config),
                    duplicate,
                    action,
                }
            })
            .collect();

        let errors = parsed
            .errors
            .iter()
            .map(|error| RowError {
                line: error.line().unwrap_or_default(),
                code: error.error_code().to_string(),
                message: error.to_string(),
            })
            .collect();

        Ok(ImportPreview::new(rows, errors))
    }
}
