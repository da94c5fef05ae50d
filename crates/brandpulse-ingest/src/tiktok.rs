//! TikTok row normalization.

use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use brandpulse_core::{AuthorMeta, LocationMeta, TikTokPost, TikTokTag};

use crate::fields::{count_field, first_date, first_string, string_value};
use crate::tags::extract_list;
use crate::RawRow;

const TIMESTAMP_KEYS: &[&str] = &["createTime", "createTimeISO", "timestamp"];

/// Normalize raw TikTok export rows into canonical posts.
///
/// Same contract as the Instagram normalizer: infallible, order-preserving,
/// idempotent modulo generated ids. Numeric `createTime` values below
/// 2x10^10 are epoch seconds; larger values are already milliseconds.
#[must_use]
pub fn normalize_tiktok_rows(rows: &[RawRow]) -> Vec<TikTokPost> {
    rows.iter().map(normalize_row).collect()
}

fn normalize_row(row: &RawRow) -> TikTokPost {
    let create_time = first_date(row, TIMESTAMP_KEYS).unwrap_or_else(|| {
        tracing::debug!("tiktok row has no parseable createTime; using now");
        Utc::now()
    });

    let text = first_string(row, &["text"]).unwrap_or_default();

    TikTokPost {
        id: Uuid::new_v4(),
        create_time,
        sentiment: brandpulse_sentiment::score(&text),
        author: extract_author(row),
        play_count: count_field(row, &["playCount"]),
        digg_count: count_field(row, &["diggCount"]),
        share_count: count_field(row, &["shareCount"]),
        comment_count: count_field(row, &["commentCount"]),
        collect_count: count_field(row, &["collectCount"]),
        hashtags: extract_tags(row),
        location: extract_location(row),
        text,
    }
}

/// Tag extraction keeps source ids when the row carries structured tag
/// objects; the generic multi-source merge supplies names otherwise.
fn extract_tags(row: &RawRow) -> Vec<TikTokTag> {
    if let Some(Value::Array(items)) = row.get("hashtags") {
        let structured: Vec<TikTokTag> = items
            .iter()
            .filter_map(|item| match item {
                Value::Object(obj) => {
                    let name = obj.get("name").and_then(string_value)?;
                    let id = obj
                        .get("id")
                        .and_then(string_value)
                        .unwrap_or_default();
                    Some(TikTokTag {
                        id: id.to_string(),
                        name: name.to_string(),
                    })
                }
                _ => None,
            })
            .collect();
        if !structured.is_empty() {
            return structured;
        }
    }

    extract_list(row, "hashtags", "hashtag")
        .into_iter()
        .map(|name| TikTokTag {
            id: String::new(),
            name,
        })
        .collect()
}

/// Author metadata arrives nested (`authorMeta: {...}`) or flattened
/// (`authorMeta/name` columns), depending on the export.
fn extract_author(row: &RawRow) -> AuthorMeta {
    if let Some(Value::Object(meta)) = row.get("authorMeta") {
        return AuthorMeta {
            id: meta
                .get("id")
                .and_then(string_value)
                .unwrap_or_default()
                .to_string(),
            name: meta
                .get("name")
                .and_then(string_value)
                .unwrap_or_default()
                .to_string(),
            fans: meta
                .get("fans")
                .and_then(crate::fields::coerce_count)
                .unwrap_or(0),
        };
    }

    AuthorMeta {
        id: first_string(row, &["authorMeta/id"]).unwrap_or_default(),
        name: first_string(row, &["authorMeta/name", "author"]).unwrap_or_default(),
        fans: count_field(row, &["authorMeta/fans", "fans"]),
    }
}

fn extract_location(row: &RawRow) -> Option<LocationMeta> {
    if let Some(Value::Object(meta)) = row.get("locationMeta") {
        let city = meta.get("city").and_then(string_value).map(ToOwned::to_owned);
        let country_code = meta
            .get("countryCode")
            .and_then(string_value)
            .map(ToOwned::to_owned);
        if city.is_none() && country_code.is_none() {
            return None;
        }
        return Some(LocationMeta { city, country_code });
    }

    let city = first_string(row, &["locationMeta/city"]);
    let country_code = first_string(row, &["locationMeta/countryCode"]);
    if city.is_none() && country_code.is_none() {
        return None;
    }
    Some(LocationMeta { city, country_code })
}
