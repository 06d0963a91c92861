//! Bank statement CSV parsing.
//!
//! The header row decides which columns hold the date, description and
//! amount. Japanese bank exports often split the amount into deposit and
//! withdrawal columns; those are folded into one signed amount.

use std::str::FromStr;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;

use super::error::ImportError;
use super::types::StatementRow;
use crate::schema::common::{validate_amount, validate_business_date};

const DATE_HEADERS: &[&str] = &["date", "日付", "取引日"];
const DESCRIPTION_HEADERS: &[&str] = &["description", "摘要", "内容", "memo"];
const AMOUNT_HEADERS: &[&str] = &["amount", "金額"];
const DEPOSIT_HEADERS: &[&str] = &["deposit", "入金", "入金額", "お預入れ"];
const WITHDRAWAL_HEADERS: &[&str] = &["withdrawal", "出金", "出金額", "お引出し"];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parsed rows plus the rows that failed.
#[derive(Debug, Default)]
pub struct ParsedStatement {
    /// Rows that parsed, in file order.
    pub rows: Vec<StatementRow>,
    /// Row-level errors, in file order.
    pub errors: Vec<ImportError>,
}

#[derive(Debug, Clone, Copy)]
enum AmountColumns {
    Signed(usize),
    Split { deposit: usize, withdrawal: usize },
}

#[derive(Debug, Clone, Copy)]
struct Columns {
    date: usize,
    description: usize,
    amount: AmountColumns,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self, ImportError> {
        let find = |names: &[&str]| {
            headers.iter().position(|h| {
                let h = h.trim_start_matches('\u{feff}').trim().to_lowercase();
                names.contains(&h.as_str())
            })
        };

        let date = find(DATE_HEADERS).ok_or(ImportError::MissingColumn("date"))?;
        let description = find(DESCRIPTION_HEADERS).ok_or(ImportError::MissingColumn("description"))?;
        let amount = match (find(AMOUNT_HEADERS), find(DEPOSIT_HEADERS), find(WITHDRAWAL_HEADERS)) {
            (Some(index), _, _) => AmountColumns::Signed(index),
            (None, Some(deposit), Some(withdrawal)) => AmountColumns::Split {
                deposit,
                withdrawal,
            },
            _ => return Err(ImportError::MissingColumn("amount")),
        };

        Ok(Self {
            date,
            description,
            amount,
        })
    }

    fn parse(&self, record: &StringRecord, line: usize) -> Result<StatementRow, ImportError> {
        let cell = |index: usize| record.get(index).unwrap_or_default();

        let raw_date = cell(self.date);
        let date = parse_date(raw_date).ok_or_else(|| ImportError::InvalidDate {
            line,
            value: raw_date.to_string(),
        })?;

        let description = cell(self.description).trim().to_string();
        if description.is_empty() {
            return Err(ImportError::EmptyDescription { line });
        }

        let invalid_amount = |value: &str| ImportError::InvalidAmount {
            line,
            value: value.to_string(),
        };
        let amount = match self.amount {
            AmountColumns::Signed(index) => {
                let raw = cell(index);
                parse_amount(raw).ok_or_else(|| invalid_amount(raw))?
            }
            AmountColumns::Split {
                deposit,
                withdrawal,
            } => {
                let (raw_in, raw_out) = (cell(deposit), cell(withdrawal));
                let money_in = parse_optional_amount(raw_in).ok_or_else(|| invalid_amount(raw_in))?;
                let money_out = parse_optional_amount(raw_out).ok_or_else(|| invalid_amount(raw_out))?;
                money_in - money_out
            }
        };
        if validate_amount(&amount.abs()).is_err() {
            return Err(invalid_amount(&amount.to_string()));
        }

        Ok(StatementRow {
            line,
            date,
            description,
            amount,
        })
    }
}

/// Parses a statement.
///
/// # Errors
///
/// Fails when the header lacks a required column, the CSV is malformed, or
/// there are no data rows. Unparseable rows are collected in
/// [`ParsedStatement::errors`] instead.
pub fn parse_statement(input: &str) -> Result<ParsedStatement, ImportError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(input.as_bytes());

    let columns = Columns::locate(reader.headers()?)?;
    let mut parsed = ParsedStatement::default();

    for (index, result) in reader.records().enumerate() {
        let record = result?;
        // +2: 1-based, after the header row
        let line = index + 2;
        if record.iter().all(str::is_empty) {
            continue;
        }
        match columns.parse(&record, line) {
            Ok(row) => parsed.rows.push(row),
            Err(error) => parsed.errors.push(error),
        }
    }

    if parsed.rows.is_empty() && parsed.errors.is_empty() {
        return Err(ImportError::Empty);
    }
    Ok(parsed)
}

/// Parses `YYYY-MM-DD` or `YYYY/MM/DD` within the accepted date range.
#[must_use]
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .filter(|date| validate_business_date(date).is_ok())
}

/// Parses an amount such as `¥1,234`, `-500`, `(500)` or `△500`.
#[must_use]
pub fn parse_amount(value: &str) -> Option<Decimal> {
    let mut text: String = value
        .chars()
        .filter(|c| !matches!(c, ',' | '¥' | '￥' | ' ' | '円'))
        .collect();

    let mut negative = false;
    if let Some(inner) = text.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
        negative = true;
        text = inner.to_string();
    }
    for marker in ['-', '△', '▲'] {
        if let Some(rest) = text.strip_prefix(marker) {
            negative = !negative;
            text = rest.to_string();
            break;
        }
    }

    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    let amount = Decimal::from_str(&text).ok()?;
    Some(if negative { -amount } else { amount })
}

fn parse_optional_amount(value: &str) -> Option<Decimal> {
    if value.trim().is_empty() {
        Some(Decimal::ZERO)
    } else {
        parse_amount(value)
    }
}
