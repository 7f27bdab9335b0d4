//! Lenient coercion of record values into numbers and instants.
//!
//! Records are loosely typed, so a `number` column may hold `25`, `"25"` or
//! `"25 tickets"`, and a `date` column may hold an RFC 3339 timestamp, a bare
//! calendar date, or epoch milliseconds. These helpers read what they can and
//! return `None` for the rest; callers decide what "unreadable" means.

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::Utc;

use crate::model::Value;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Parses the leading numeric prefix of a string.
///
/// Leading whitespace is skipped and trailing garbage is ignored, so
/// `"42abc"` reads as `42`. Returns `None` when no digits lead the string.
pub fn parse_number(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    if s[end..].starts_with("Infinity") {
        return Some(if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let mut digits = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return None;
    }

    // Exponent only counts when digits follow it
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

/// Parses a calendar date or date-time string as a UTC instant.
///
/// Accepts RFC 3339, `YYYY-MM-DD`, and `YYYY-MM-DD[T ]HH:MM[:SS[.fff]]`
/// (naive forms are read as UTC).
pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Reads a value as a number.
pub fn value_number(value: &Value) -> Option<f64> {
    match value {
        Value::Int(n) => Some(*n as f64),
        Value::Float(n) => Some(*n),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

/// Reads a value as an instant. Numbers are epoch milliseconds.
pub fn value_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Int(ms) => DateTime::from_timestamp_millis(*ms),
        Value::Float(ms) if ms.is_finite() => DateTime::from_timestamp_millis(*ms as i64),
        Value::String(s) => parse_date(s),
        _ => None,
    }
}
