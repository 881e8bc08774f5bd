//! Calendar-day helpers for `YYYY-MM-DD` strings.
//!
//! Dates are always interpreted as UTC calendar days. No time zone is ever
//! consulted, so a given string maps to the same weekday on every host.

use chrono::{Datelike, Duration, NaiveDate};
use thiserror::Error;

/// Errors raised while validating a date string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("{field} must be a YYYY-MM-DD date, got {value:?}")]
    Malformed { field: String, value: String },

    #[error("{field} is not a real calendar day: {value:?}")]
    NotACalendarDay { field: String, value: String },
}

/// Check that `value` has the exact `YYYY-MM-DD` shape (fixed width, zero
/// padded, ASCII digits) and names a real calendar day.
pub fn assert_iso_date(value: &str, field: &str) -> Result<(), DateError> {
    parse_iso_date(value, field).map(|_| ())
}

/// Parse a `YYYY-MM-DD` string into a [`NaiveDate`].
pub fn parse_iso_date(value: &str, field: &str) -> Result<NaiveDate, DateError> {
    let bytes = value.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(DateError::Malformed {
            field: field.to_owned(),
            value: value.to_owned(),
        });
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| DateError::NotACalendarDay {
        field: field.to_owned(),
        value: value.to_owned(),
    })
}

/// ISO weekday of a date string: 1 (Monday) through 7 (Sunday).
pub fn weekday_from_iso_date(value: &str) -> Result<u8, DateError> {
    let date = parse_iso_date(value, "date")?;
    // number_from_monday() is 1..=7, the cast cannot truncate.
    Ok(date.weekday().number_from_monday() as u8)
}

/// Inclusive range membership.
///
/// Plain string comparison is sound because every operand is a fixed-width,
/// zero-padded `YYYY-MM-DD` string.
pub fn is_date_in_range_inclusive(date: &str, start: &str, end: &str) -> bool {
    start <= date && date <= end
}

/// Render a [`NaiveDate`] in the `YYYY-MM-DD` wire format.
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Every day from `start` to `end`, both included. Empty when `start > end`.
pub fn date_range_inclusive(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut current = start;
    while current <= end {
        days.push(current);
        current += Duration::days(1);
    }
    days
}
