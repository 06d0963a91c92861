//! Bank statement import.
//!
//! Parses statement CSVs, proposes accounts through mapping rules and flags
//! likely duplicates before anything is booked.

pub mod duplicate;
pub mod error;
pub mod parser;
pub mod rules;
pub mod service;
pub mod types;

pub use duplicate::{DuplicateDetector, action_for, existing_confidence, similarity};
pub use error::ImportError;
pub use parser::{ParsedStatement, parse_amount, parse_date, parse_statement};
pub use rules::{MappingRule, MatchType, RuleSet};
pub use service::ImportService;
pub use types::*;
