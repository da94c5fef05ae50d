//! Multi-source hashtag and mention extraction.
//!
//! Export files surface the same logical list three different ways: a
//! single comma-delimited cell, a run of suffix-indexed columns
//! (`hashtags/0`, `hashtags/1`, ...), or ad-hoc columns that merely contain
//! the keyword in their header. Strategies are tried in that order and the
//! first non-empty result wins.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::fields::string_value;
use crate::RawRow;

/// Upper bound on the indexed-column scan. Observed exports top out well
/// below this.
const MAX_INDEXED_COLUMNS: usize = 20;

static INDEXED_COLUMN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z]+)/(\d+)$").expect("valid indexed-column regex"));

/// Extract an ordered, deduplicated list for `field` (e.g. `"hashtags"`).
///
/// `keyword` is the fallback substring matched against column names
/// (e.g. `"hashtag"`). Original spelling and case are preserved; exact
/// duplicates are dropped, keeping the first occurrence.
pub(crate) fn extract_list(row: &RawRow, field: &str, keyword: &str) -> Vec<String> {
    let delimited = from_delimited_field(row, field);
    if !delimited.is_empty() {
        return dedup(delimited);
    }

    let indexed = from_indexed_columns(row, field);
    if !indexed.is_empty() {
        return dedup(indexed);
    }

    dedup(from_keyword_columns(row, keyword))
}

/// Strategy 1: a single cell under the exact field name, either a
/// comma-delimited string or a ready-made array.
fn from_delimited_field(row: &RawRow, field: &str) -> Vec<String> {
    match row.get(field) {
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(ToOwned::to_owned)
            .collect(),
        Some(Value::Array(items)) => items.iter().filter_map(item_name).collect(),
        _ => Vec::new(),
    }
}

/// Strategy 2: suffix-indexed columns (`field/0` .. `field/19`), collected
/// in index order regardless of key iteration order.
fn from_indexed_columns(row: &RawRow, field: &str) -> Vec<String> {
    let mut found: Vec<(usize, String)> = Vec::new();
    for (key, value) in row {
        let Some(caps) = INDEXED_COLUMN_RE.captures(key) else {
            continue;
        };
        if &caps[1] != field {
            continue;
        }
        let Ok(index) = caps[2].parse::<usize>() else {
            continue;
        };
        if index >= MAX_INDEXED_COLUMNS {
            continue;
        }
        if let Some(name) = item_name(value) {
            found.push((index, name));
        }
    }

    found.sort_by_key(|(index, _)| *index);
    found.into_iter().map(|(_, name)| name).collect()
}

/// Strategy 3: any column whose name contains the keyword, holding a
/// non-empty string.
fn from_keyword_columns(row: &RawRow, keyword: &str) -> Vec<String> {
    row.iter()
        .filter(|(key, _)| key.to_ascii_lowercase().contains(keyword))
        .filter_map(|(_, value)| string_value(value))
        .map(ToOwned::to_owned)
        .collect()
}

/// A list item is either a bare string or a tag object carrying a `name`.
fn item_name(value: &Value) -> Option<String> {
    match value {
        Value::String(_) => string_value(value).map(ToOwned::to_owned),
        Value::Object(obj) => obj.get("name").and_then(string_value).map(ToOwned::to_owned),
        _ => None,
    }
}

fn dedup(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
