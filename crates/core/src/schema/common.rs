//! Shared field rules.

use std::borrow::Cow;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use validator::ValidationError;

/// Largest amount accepted on any monetary field.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 0); // 999,999,999,999

/// Account code: 3 to 10 ASCII digits.
pub static ACCOUNT_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{3,10}$").expect("valid regex"));
/// Partner code: 1 to 20 ASCII letters, digits, `_` or `-`.
pub static PARTNER_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,20}$").expect("valid regex"));
/// Japanese phone number, hyphens optional.
pub static PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0[0-9]{1,4}-?[0-9]{1,4}-?[0-9]{3,4}$").expect("valid regex"));
/// Japanese postal code (〒123-4567).
pub static POSTAL_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{3}-?[0-9]{4}$").expect("valid regex"));
/// Seven-digit bank account number.
pub static BANK_ACCOUNT_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{7}$").expect("valid regex"));

fn error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Monetary amount: non-negative, at most 2 decimal places, bounded.
pub fn validate_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(error("amount_negative", "Amounts cannot be negative"));
    }
    if *amount > MAX_AMOUNT {
        return Err(error("amount_too_large", "Amount is too large"));
    }
    if amount.normalize().scale() > 2 {
        return Err(error("amount_precision", "Use at most 2 decimal places"));
    }
    Ok(())
}

/// Consumption tax rate in percent.
pub fn validate_tax_rate(rate: &Decimal) -> Result<(), ValidationError> {
    if *rate < Decimal::ZERO || *rate > Decimal::ONE_HUNDRED {
        return Err(error("tax_rate_range", "Tax rate must be between 0 and 100"));
    }
    Ok(())
}

/// Business dates must be plausible.
pub fn validate_business_date(date: &NaiveDate) -> Result<(), ValidationError> {
    let earliest = NaiveDate::from_ymd_opt(1900, 1, 1);
    let latest = NaiveDate::from_ymd_opt(2100, 12, 31);
    match (earliest, latest) {
        (Some(earliest), Some(latest)) if (earliest..=latest).contains(date) => Ok(()),
        _ => Err(error("date_range", "Date must be between 1900 and 2100")),
    }
}

/// Mapping rule confidence in `[0, 1]`.
pub fn validate_confidence(confidence: &Decimal) -> Result<(), ValidationError> {
    if *confidence < Decimal::ZERO || *confidence > Decimal::ONE {
        return Err(error("confidence_range", "Confidence must be between 0 and 1"));
    }
    Ok(())
}
