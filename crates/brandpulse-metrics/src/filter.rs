//! Month and date-range filtering over posts.
//!
//! The month selector and the date range are deliberately independent
//! checks combined with AND: a caller may pair an arbitrary range with a
//! named month, even though the usual UI flow derives the range from the
//! month itself.

use chrono::{DateTime, Utc};
use serde_json::Value;

use brandpulse_core::{parse_date_like, DateRange, FilterSelection, MonthName, MonthSelection,
    Timestamped};

/// Does a typed timestamp match the raw month selection?
///
/// The "all months" sentinel matches every timestamp; a named month
/// compares English month names case-insensitively; an unrecognized
/// selection matches nothing.
#[must_use]
pub fn month_matches(ts: DateTime<Utc>, selection: &str) -> bool {
    match MonthSelection::parse(selection) {
        MonthSelection::AllMonths => true,
        MonthSelection::Named(month) => MonthName::of(ts) == month,
        MonthSelection::Unrecognized(_) => false,
    }
}

/// Does a loosely-encoded timestamp match the raw month selection?
///
/// The sentinel short-circuits before any parsing, so even an unparseable
/// timestamp passes an "all" selection. Otherwise a timestamp that fails
/// every parse strategy is treated as non-matching, not an error.
#[must_use]
pub fn is_in_selected_month(value: &Value, selection: &str) -> bool {
    if MonthSelection::parse(selection) == MonthSelection::AllMonths {
        return true;
    }
    match parse_date_like(value) {
        Some(ts) => month_matches(ts, selection),
        None => false,
    }
}

/// Posts whose instant falls inside the inclusive range.
#[must_use]
pub fn filter_by_date_range<'a, T: Timestamped>(posts: &'a [T], range: &DateRange) -> Vec<&'a T> {
    posts
        .iter()
        .filter(|post| range.contains(post.occurred_at()))
        .collect()
}

/// The combined active filter: date range AND month name must both pass.
#[must_use]
pub fn filter_posts<'a, T: Timestamped>(
    posts: &'a [T],
    selection: &FilterSelection,
) -> Vec<&'a T> {
    posts
        .iter()
        .filter(|post| {
            let ts = post.occurred_at();
            selection.date_range.contains(ts) && month_matches(ts, &selection.selected_month)
        })
        .collect()
}
