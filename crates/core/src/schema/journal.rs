//! Journal entry input.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;
use choubo_shared::types::{AccountId, JournalEntryId, JournalLineId, OrganizationId, PartnerId};

use super::common::{validate_amount, validate_business_date, validate_tax_rate};
use crate::ledger::{EntryStatus, JournalEntry, JournalLine};

/// A journal entry as submitted by a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct JournalEntryInput {
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Entry date.
    #[validate(custom(function = "validate_business_date"))]
    pub date: NaiveDate,
    /// Description (摘要).
    #[validate(length(min = 1, max = 200, message = "Description must be 1 to 200 characters"))]
    pub description: String,
    /// Entry lines.
    #[validate(length(min = 2, message = "At least two lines are required"), nested)]
    pub lines: Vec<JournalLineInput>,
}

impl JournalEntryInput {
    /// Converts the input into a new draft entry.
    #[must_use]
    pub fn into_entry(self) -> JournalEntry {
        JournalEntry {
            id: JournalEntryId::new(),
            organization_id: self.organization_id,
            date: self.date,
            description: self.description.trim().to_string(),
            status: EntryStatus::Draft,
            lines: self.lines.into_iter().map(JournalLineInput::into_line).collect(),
        }
    }
}

/// One line of a submitted journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct JournalLineInput {
    /// Account posted to.
    pub account_id: AccountId,
    /// Counterparty.
    #[serde(default)]
    pub partner_id: Option<PartnerId>,
    /// Debit amount.
    #[serde(default)]
    #[validate(custom(function = "validate_amount"))]
    pub debit: Decimal,
    /// Credit amount.
    #[serde(default)]
    #[validate(custom(function = "validate_amount"))]
    pub credit: Decimal,
    /// Tax rate in percent.
    #[serde(default)]
    #[validate(custom(function = "validate_tax_rate"))]
    pub tax_rate: Option<Decimal>,
    /// Tax amount.
    #[serde(default)]
    #[validate(custom(function = "validate_amount"))]
    pub tax_amount: Option<Decimal>,
    /// Line memo.
    #[serde(default)]
    #[validate(length(max = 200, message = "Memo must be at most 200 characters"))]
    pub memo: Option<String>,
}

impl JournalLineInput {
    /// Converts the input into a journal line with a fresh ID.
    #[must_use]
    pub fn into_line(self) -> JournalLine {
        JournalLine {
            id: JournalLineId::new(),
            account_id: self.account_id,
            partner_id: self.partner_id,
            debit: self.debit,
            credit: self.credit,
            tax_rate: self.tax_rate,
            tax_amount: self.tax_amount,
            memo: self.memo.filter(|m| !m.trim().is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::field_errors;
    use rust_decimal_macros::dec;

    fn line(debit: Decimal, credit: Decimal) -> JournalLineInput {
        JournalLineInput {
            account_id: AccountId::new(),
            partner_id: None,
            debit,
            credit,
            tax_rate: None,
            tax_amount: None,
            memo: None,
        }
    }

    fn input() -> JournalEntryInput {
        JournalEntryInput {
            organization_id: OrganizationId::new(),
            date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            description: "売上計上".into(),
            lines: vec![line(dec!(100000), Decimal::ZERO), line(Decimal::ZERO, dec!(100000))],
        }
    }

    #[test]
    fn test_valid_input() {
        assert!(field_errors(&input()).is_empty());
    }

    #[test]
    fn test_errors_are_aggregated_per_field() {
        let mut bad = input();
        bad.description = String::new();
        bad.date = NaiveDate::from_ymd_opt(1850, 1, 1).unwrap();
        bad.lines[1].credit = dec!(0.001);
        bad.lines[0].tax_rate = Some(dec!(150));

        let errors = field_errors(&bad);
        assert!(errors.contains("description"));
        assert!(errors.contains("date"));
        assert!(errors.contains("lines[1].credit"));
        assert!(errors.contains("lines[0].tax_rate"));
    }

    #[test]
    fn test_too_few_lines() {
        let mut bad = input();
        bad.lines.truncate(1);
        assert_eq!(
            field_errors(&bad).get("lines"),
            Some(&["At least two lines are required".to_string()][..])
        );
    }

    #[test]
    fn test_into_entry_is_draft() {
        let entry = input().into_entry();
        assert_eq!(entry.status, EntryStatus::Draft);
        assert_eq!(entry.lines.len(), 2);
        assert!(entry.is_balanced());
    }
}
