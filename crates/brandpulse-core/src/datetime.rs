//! Tolerant timestamp parsing shared by the normalizer and the month filter.
//!
//! Export rows encode timestamps inconsistently: ISO 8601 strings, naive
//! date strings, epoch seconds, epoch milliseconds, and numeric strings in
//! scientific notation all occur in the same column across source files.
//! Parsing is an ordered strategy list; the first strategy that succeeds
//! wins, and total failure is `None` rather than an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

/// Numeric epoch values below this are interpreted as seconds and scaled to
/// milliseconds; values at or above it are already milliseconds. 2x10^10
/// seconds is year 2603, far past any plausible post date, while 2x10^10
/// milliseconds is mid-1970, so the ranges do not overlap in practice.
const EPOCH_MILLIS_CUTOFF: f64 = 2.0e10;

/// Parse a loosely-typed timestamp value into a UTC instant.
///
/// Strategies, in order:
/// 1. RFC 3339 / ISO 8601 string.
/// 2. Naive `YYYY-MM-DD HH:MM:SS`, then bare `YYYY-MM-DD` (interpreted UTC).
/// 3. Number or numeric string (scientific notation included), with the
///    seconds/milliseconds disambiguation of [`EPOCH_MILLIS_CUTOFF`].
///
/// Returns `None` when every strategy fails; callers pick the fallback
/// (the normalizer substitutes "now", the filter treats it as no match).
#[must_use]
pub fn parse_date_like(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_date_str(s.trim()),
        Value::Number(n) => n.as_f64().and_then(parse_epoch),
        _ => None,
    }
}

/// Parse a timestamp from a raw string using the same strategy order.
#[must_use]
pub fn parse_date_str(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|n| n.and_utc());
    }
    // Numeric strings, including scientific notation like "1.7E9".
    s.parse::<f64>().ok().and_then(parse_epoch)
}

/// Convert an ambiguous numeric epoch into a UTC instant.
fn parse_epoch(raw: f64) -> Option<DateTime<Utc>> {
    if !raw.is_finite() || raw <= 0.0 {
        return None;
    }
    let millis = if raw < EPOCH_MILLIS_CUTOFF {
        raw * 1000.0
    } else {
        raw
    };
    #[allow(clippy::cast_precision_loss)]
    let overflow = millis >= i64::MAX as f64;
    if overflow {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    let millis = millis as i64;
    DateTime::from_timestamp_millis(millis)
}
