//! Internal helpers for input validation and date math.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation so every entry point enforces the same rules.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine};

/// Amounts stored on transactions and budgets must be strictly positive.
pub(crate) fn ensure_positive_amount(amount: Money, label: &str) -> ResultEngine<()> {
    if !amount.is_positive() {
        return Err(EngineError::Validation(format!("{label} must be > 0")));
    }
    Ok(())
}

pub(crate) fn validate_period(month: u32, year: i32) -> ResultEngine<()> {
    if !(1..=12).contains(&month) {
        return Err(EngineError::Validation(format!(
            "month must be between 1 and 12, got {month}"
        )));
    }
    if !(1..=9999).contains(&year) {
        return Err(EngineError::Validation(format!(
            "year must be between 1 and 9999, got {year}"
        )));
    }
    Ok(())
}

/// First and last calendar day of `month`/`year`, both inclusive.
pub(crate) fn month_bounds(month: u32, year: i32) -> ResultEngine<(NaiveDate, NaiveDate)> {
    validate_period(month, year)?;
    let invalid = || EngineError::Validation(format!("invalid period {year}-{month:02}"));
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(invalid)?;
    let last = next_first.pred_opt().ok_or_else(invalid)?;
    debug_assert_eq!(last.month(), month);
    Ok((first, last))
}

pub(crate) fn validate_window(from: Option<NaiveDate>, to: Option<NaiveDate>) -> ResultEngine<()> {
    if let (Some(from), Some(to)) = (from, to)
        && from > to
    {
        return Err(EngineError::Validation(format!(
            "start date {from} is after end date {to}"
        )));
    }
    Ok(())
}

/// Opaque bearer token: 32 random bytes, URL-safe base64.
pub(crate) fn new_session_token() -> String {
    let mut bytes = [0u8; 32];
    bytes[..16].copy_from_slice(Uuid::new_v4().as_bytes());
    bytes[16..].copy_from_slice(Uuid::new_v4().as_bytes());
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_bounds_handles_leap_years_and_december() {
        let (first, last) = month_bounds(2, 2024).unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let (_, last) = month_bounds(12, 2023).unwrap();
        assert_eq!(last, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
    }

    #[test]
    fn period_rejects_out_of_range_month() {
        assert!(validate_period(0, 2024).is_err());
        assert!(validate_period(13, 2024).is_err());
        assert!(validate_period(12, 0).is_err());
        assert!(validate_period(1, 2024).is_ok());
    }

    #[test]
    fn window_rejects_inverted_range() {
        let jan = NaiveDate::from_ymd_opt(2024, 1, 1);
        let feb = NaiveDate::from_ymd_opt(2024, 2, 1);
        assert!(validate_window(feb, jan).is_err());
        assert!(validate_window(jan, feb).is_ok());
        assert!(validate_window(jan, jan).is_ok());
        assert!(validate_window(None, jan).is_ok());
    }

    #[test]
    fn session_tokens_are_unique_and_url_safe() {
        let a = new_session_token();
        let b = new_session_token();
        assert_ne!(a, b);
        assert_eq!(a.len(), 43);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}
