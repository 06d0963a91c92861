//! Mapping rules from statement descriptions to accounts.
//!
//! Patterns are compiled once per import. Matching is case-insensitive;
//! among the rules that match, the highest confidence wins and ties go to the
//! earlier rule.

use regex::{Regex, RegexBuilder};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use choubo_shared::ImportConfig;

use super::error::ImportError;
use super::types::{StatementRow, SuggestedEntry};

/// How a rule's pattern is compared with a description.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// Whole description equals the pattern.
    Exact,
    /// Description contains the pattern.
    #[default]
    Contains,
    /// Description starts with the pattern.
    StartsWith,
    /// Description ends with the pattern.
    EndsWith,
    /// Pattern is a regular expression.
    Regex,
}

/// A rule mapping matching descriptions to a debit and credit account.
///
/// The accounts apply to money coming in; rows with a negative amount swap
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRule {
    /// Pattern compared with the description.
    pub pattern: String,
    /// How `pattern` is compared.
    #[serde(default)]
    pub match_type: MatchType,
    /// Account code to debit.
    pub debit_account_code: String,
    /// Account code to credit.
    pub credit_account_code: String,
    /// Confidence in `[0, 1]`.
    pub confidence: Decimal,
}

#[derive(Debug)]
struct CompiledRule {
    rule: MappingRule,
    needle: String,
    regex: Option<Regex>,
}

impl CompiledRule {
    fn matches(&self, description: &str, lowered: &str) -> bool {
        match self.rule.match_type {
            MatchType::Exact => lowered == self.needle,
            MatchType::Contains => lowered.contains(&self.needle),
            MatchType::StartsWith => lowered.starts_with(&self.needle),
            MatchType::EndsWith => lowered.ends_with(&self.needle),
            MatchType::Regex => self.regex.as_ref().is_some_and(|r| r.is_match(description)),
        }
    }
}

/// Compiled mapping rules.
#[derive(Debug, Default)]
pub struct RuleSet {
    rules: Vec<CompiledRule>,
}

impl RuleSet {
    /// Compiles rules.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::InvalidPattern`] for the first rule whose
    /// pattern is blank or, for regex rules, does not compile.
    pub fn compile(rules: &[MappingRule]) -> Result<Self, ImportError> {
        let rules = rules
            .iter()
            .enumerate()
            .map(|(index, rule)| {
                if rule.pattern.trim().is_empty() {
                    return Err(ImportError::InvalidPattern {
                        index,
                        pattern: rule.pattern.clone(),
                        reason: "pattern is blank".to_string(),
                    });
                }
                let regex = match rule.match_type {
                    MatchType::Regex => Some(
                        RegexBuilder::new(&rule.pattern)
                            .case_insensitive(true)
                            .build()
                            .map_err(|e| ImportError::InvalidPattern {
                                index,
                                pattern: rule.pattern.clone(),
                                reason: e.to_string(),
                            })?,
                    ),
                    _ => None,
                };
                Ok(CompiledRule {
                    rule: rule.clone(),
                    needle: rule.pattern.trim().to_lowercase(),
                    regex,
                })
            })
            .collect::<Result<Vec<_>, ImportError>>()?;
        Ok(Self { rules })
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if there are no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns the best rule for a description.
    #[must_use]
    pub fn best_match(&self, description: &str) -> Option<&MappingRule> {
        let lowered = description.trim().to_lowercase();
        let mut best: Option<&MappingRule> = None;
        for compiled in self.rules.iter().filter(|c| c.matches(description, &lowered)) {
            if best.is_none_or(|b| compiled.rule.confidence > b.confidence) {
                best = Some(&compiled.rule);
            }
        }
        best
    }

    /// Proposes debit and credit accounts for a row.
    ///
    /// Unmatched rows fall back to the configured suspense accounts with zero
    /// confidence.
    #[must_use]
    pub fn suggest(&self, row: &StatementRow, config: &ImportConfig) -> SuggestedEntry {
        let (debit, credit, pattern, confidence) = match self.best_match(&row.description) {
            Some(rule) => (
                rule.debit_account_code.clone(),
                rule.credit_account_code.clone(),
                Some(rule.pattern.clone()),
                rule.confidence,
            ),
            None => (
                config.suspense_debit_code.clone(),
                config.suspense_credit_code.clone(),
                None,
                Decimal::ZERO,
            ),
        };

        let (debit_account_code, credit_account_code) = if row.amount.is_sign_negative() {
            (credit, debit)
        } else {
            (debit, credit)
        };

        SuggestedEntry {
            debit_account_code,
            credit_account_code,
            amount: row.amount.abs(),
            matched_pattern: pattern,
            confidence,
        }
    }
}
