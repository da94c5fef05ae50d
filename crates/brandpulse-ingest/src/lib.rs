//! The schema-tolerance layer: loose spreadsheet rows in, canonical posts out.
//!
//! Source exports disagree on field names, value types, and timestamp
//! encodings; normalization absorbs all of that here so the strict post
//! types never see it. By contract nothing in this crate panics on
//! malformed input: a row that fails to produce a numeric field yields
//! zeros, a row with no parseable timestamp falls back to "now".

pub mod instagram;
pub mod tiktok;

mod fields;
mod tags;

/// One loosely-typed source record: arbitrary string-keyed values, no
/// schema guaranteed.
pub type RawRow = serde_json::Map<String, serde_json::Value>;

pub use instagram::normalize_instagram_rows;
pub use tiktok::normalize_tiktok_rows;
