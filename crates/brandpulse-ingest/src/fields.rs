//! Internal coercion primitives for loosely-typed row values.
//!
//! Every helper here recovers locally: a value that cannot be interpreted
//! produces the documented fallback, never an error. This module is
//! `pub(crate)` so the two platform normalizers share the same rules.

use chrono::{DateTime, Utc};
use serde_json::Value;

use brandpulse_core::parse_date_like;

use crate::RawRow;

/// Coerce a single value into a non-negative count.
///
/// Numbers are truncated toward zero and clamped at zero; numeric strings
/// (including decimals) are parsed the same way. Anything else is `None`.
pub(crate) fn coerce_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Some(u)
            } else {
                // Negative or fractional: clamp and truncate.
                n.as_f64().map(clamp_count)
            }
        }
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            if let Ok(u) = trimmed.parse::<u64>() {
                return Some(u);
            }
            trimmed.parse::<f64>().ok().map(clamp_count)
        }
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_count(f: f64) -> u64 {
    if !f.is_finite() || f <= 0.0 {
        return 0;
    }
    f.trunc() as u64
}

/// First of `keys` that coerces to a count; 0 when none do.
pub(crate) fn count_field(row: &RawRow, keys: &[&str]) -> u64 {
    keys.iter()
        .find_map(|key| row.get(*key).and_then(coerce_count))
        .unwrap_or(0)
}

/// First of `keys` that coerces to a count; `None` when none do.
/// Used for fields where absence is meaningful (video view/play counts).
pub(crate) fn opt_count_field(row: &RawRow, keys: &[&str]) -> Option<u64> {
    keys.iter()
        .find_map(|key| row.get(*key).and_then(coerce_count))
}

/// Non-empty trimmed string value at `key`.
pub(crate) fn string_value(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then_some(trimmed)
        }
        _ => None,
    }
}

/// First of `keys` holding a non-empty string.
pub(crate) fn first_string(row: &RawRow, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| row.get(*key).and_then(string_value))
        .map(ToOwned::to_owned)
}

/// First of `keys` that parses as a date under the shared strategy list.
pub(crate) fn first_date(row: &RawRow, keys: &[&str]) -> Option<DateTime<Utc>> {
    keys.iter()
        .find_map(|key| row.get(*key).and_then(parse_date_like))
}

/// Boolean flag: JSON `true`, or the strings `"TRUE"`/`"true"` (any case).
/// Everything else is `false`.
pub(crate) fn bool_field(row: &RawRow, key: &str) -> bool {
    match row.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn row(pairs: &[(&str, Value)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn coerce_count_accepts_integers_and_numeric_strings() {
        assert_eq!(coerce_count(&json!(42)), Some(42));
        assert_eq!(coerce_count(&json!("42")), Some(42));
        assert_eq!(coerce_count(&json!("  42  ")), Some(42));
    }

    #[test]
    fn coerce_count_truncates_floats() {
        assert_eq!(coerce_count(&json!(41.9)), Some(41));
        assert_eq!(coerce_count(&json!("41.9")), Some(41));
    }

    #[test]
    fn coerce_count_clamps_negatives_to_zero() {
        assert_eq!(coerce_count(&json!(-5)), Some(0));
        assert_eq!(coerce_count(&json!("-5.5")), Some(0));
    }

    #[test]
    fn coerce_count_rejects_non_numeric() {
        assert_eq!(coerce_count(&json!("lots")), None);
        assert_eq!(coerce_count(&json!("")), None);
        assert_eq!(coerce_count(&json!(null)), None);
        assert_eq!(coerce_count(&json!(true)), None);
    }

    #[test]
    fn count_field_falls_back_to_zero() {
        let r = row(&[("likes", json!("oops"))]);
        assert_eq!(count_field(&r, &["likesCount", "likes"]), 0);
    }

    #[test]
    fn count_field_probes_keys_in_order() {
        let r = row(&[("likes", json!(7)), ("likesCount", json!(9))]);
        assert_eq!(count_field(&r, &["likesCount", "likes"]), 9);
    }

    #[test]
    fn opt_count_field_is_none_when_absent() {
        let r = row(&[]);
        assert_eq!(opt_count_field(&r, &["videoViewCount"]), None);
    }

    #[test]
    fn first_string_skips_empty_values() {
        let r = row(&[("caption", json!("   ")), ("text", json!("hello"))]);
        assert_eq!(first_string(&r, &["caption", "text"]), Some("hello".to_string()));
    }

    #[test]
    fn first_date_probes_in_order() {
        let r = row(&[
            ("date", json!("2024-01-01T00:00:00Z")),
            ("timestamp", json!("2024-03-15T00:00:00Z")),
        ]);
        let ts = first_date(&r, &["timestamp", "date"]).unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-03-15T00:00:00+00:00");
    }

    #[test]
    fn bool_field_accepts_string_encodings() {
        assert!(bool_field(&row(&[("isSponsored", json!(true))]), "isSponsored"));
        assert!(bool_field(&row(&[("isSponsored", json!("TRUE"))]), "isSponsored"));
        assert!(bool_field(&row(&[("isSponsored", json!("true"))]), "isSponsored"));
        assert!(!bool_field(&row(&[("isSponsored", json!("yes"))]), "isSponsored"));
        assert!(!bool_field(&row(&[]), "isSponsored"));
    }
}
