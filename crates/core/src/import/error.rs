//! Import error types.

use thiserror::Error;

use choubo_shared::AppError;

/// Errors that can occur while importing a bank statement.
///
/// Row-level problems (`InvalidDate`, `InvalidAmount`, `EmptyDescription`)
/// are collected into the preview; the rest abort the whole import.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The statement has no data rows.
    #[error("The statement contains no rows")]
    Empty,

    /// A required column is missing from the header.
    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),

    /// The CSV itself could not be read.
    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A date cell could not be parsed.
    #[error("Line {line}: invalid date '{value}'")]
    InvalidDate {
        /// 1-based line number in the file.
        line: usize,
        /// Raw cell value.
        value: String,
    },

    /// An amount cell could not be parsed.
    #[error("Line {line}: invalid amount '{value}'")]
    InvalidAmount {
        /// 1-based line number in the file.
        line: usize,
        /// Raw cell value.
        value: String,
    },

    /// The description cell is blank.
    #[error("Line {line}: description is empty")]
    EmptyDescription {
        /// 1-based line number in the file.
        line: usize,
    },

    /// A mapping rule's regular expression does not compile.
    #[error("Rule {index}: invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// Position of the rule.
        index: usize,
        /// The pattern.
        pattern: String,
        /// Compiler message.
        reason: String,
    },
}

impl ImportError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Empty => "EMPTY_STATEMENT",
            Self::MissingColumn(_) => "MISSING_COLUMN",
            Self::Csv(_) => "MALFORMED_CSV",
            Self::InvalidDate { .. } => "INVALID_DATE",
            Self::InvalidAmount { .. } => "INVALID_AMOUNT",
            Self::EmptyDescription { .. } => "EMPTY_DESCRIPTION",
            Self::InvalidPattern { .. } => "INVALID_PATTERN",
        }
    }

    /// Returns the 1-based file line of a row-level error.
    #[must_use]
    pub const fn line(&self) -> Option<usize> {
        match self {
            Self::InvalidDate { line, .. }
            | Self::InvalidAmount { line, .. }
            | Self::EmptyDescription { line } => Some(*line),
            _ => None,
        }
    }
}

impl From<ImportError> for AppError {
    fn from(error: ImportError) -> Self {
        match &error {
            ImportError::InvalidPattern { index, .. } => {
                Self::field(format!("rules[{index}].pattern"), error.to_string())
            }
            _ => Self::field("csv", error.to_string()),
        }
    }
}
