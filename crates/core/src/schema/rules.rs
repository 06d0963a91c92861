//! Mapping rule input.

use std::borrow::Cow;

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::common::{ACCOUNT_CODE, validate_confidence};
use crate::import::{MappingRule, MatchType};

/// A statement mapping rule as submitted by a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_pattern", skip_on_field_errors = false))]
pub struct MappingRuleInput {
    /// Text matched against statement descriptions.
    #[validate(
        length(min = 1, max = 200, message = "Pattern must be 1 to 200 characters"),
        custom(function = "validate_not_blank")
    )]
    pub pattern: String,
    /// How the pattern is matched.
    #[serde(default)]
    pub match_type: MatchType,
    /// Account debited for deposits.
    #[validate(regex(path = *ACCOUNT_CODE, message = "Account code must be 3 to 10 digits"))]
    pub debit_account_code: String,
    /// Account credited for deposits.
    #[validate(regex(path = *ACCOUNT_CODE, message = "Account code must be 3 to 10 digits"))]
    pub credit_account_code: String,
    /// Confidence of suggestions from this rule, 0 to 1.
    #[validate(custom(function = "validate_confidence"))]
    pub confidence: Decimal,
}

fn validate_not_blank(pattern: &str) -> Result<(), ValidationError> {
    if pattern.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message(Cow::Borrowed("Pattern cannot be blank")));
    }
    Ok(())
}

fn validate_pattern(input: &MappingRuleInput) -> Result<(), ValidationError> {
    if input.match_type == MatchType::Regex && Regex::new(&input.pattern).is_err() {
        return Err(ValidationError::new("invalid_regex")
            .with_message(Cow::Borrowed("Pattern is not a valid regular expression")));
    }
    Ok(())
}

impl From<MappingRuleInput> for MappingRule {
    fn from(input: MappingRuleInput) -> Self {
        Self {
            pattern: input.pattern,
            match_type: input.match_type,
            debit_account_code: input.debit_account_code,
            credit_account_code: input.credit_account_code,
            confidence: input.confidence,
        }
    }
}
