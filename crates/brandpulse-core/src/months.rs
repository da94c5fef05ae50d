//! Month names, date ranges, and the dashboard's active filter selection.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::platform::Platform;

/// Locale-independent English month names, matched case-insensitively
/// against the UI's month selector values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonthName {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl MonthName {
    pub const ALL: [MonthName; 12] = [
        MonthName::January,
        MonthName::February,
        MonthName::March,
        MonthName::April,
        MonthName::May,
        MonthName::June,
        MonthName::July,
        MonthName::August,
        MonthName::September,
        MonthName::October,
        MonthName::November,
        MonthName::December,
    ];

    #[must_use]
    pub fn english(self) -> &'static str {
        match self {
            MonthName::January => "January",
            MonthName::February => "February",
            MonthName::March => "March",
            MonthName::April => "April",
            MonthName::May => "May",
            MonthName::June => "June",
            MonthName::July => "July",
            MonthName::August => "August",
            MonthName::September => "September",
            MonthName::October => "October",
            MonthName::November => "November",
            MonthName::December => "December",
        }
    }

    /// 1-based calendar index, January = 1.
    #[must_use]
    pub fn index(self) -> u32 {
        Self::ALL
            .iter()
            .position(|m| *m == self)
            .map_or(1, |i| u32::try_from(i).unwrap_or(0) + 1)
    }

    /// Month from a 1-based calendar index.
    #[must_use]
    pub fn from_index(index: u32) -> Option<Self> {
        let idx = usize::try_from(index).ok()?.checked_sub(1)?;
        Self::ALL.get(idx).copied()
    }

    /// The calendar month of a UTC instant.
    #[must_use]
    pub fn of(ts: DateTime<Utc>) -> Self {
        Self::ALL[ts.month0() as usize]
    }

    /// Case-insensitive parse of an English month name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        Self::ALL
            .iter()
            .find(|m| m.english().eq_ignore_ascii_case(trimmed))
            .copied()
    }
}

impl std::fmt::Display for MonthName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.english())
    }
}

/// Inclusive UTC time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// Range covering exactly one calendar month of the given year.
    #[must_use]
    pub fn calendar_month(year: i32, month: MonthName) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, month.index(), 1)?
            .and_hms_opt(0, 0, 0)?
            .and_utc();
        let (next_year, next_month) = match month {
            MonthName::December => (year + 1, 1),
            _ => (year, month.index() + 1),
        };
        let next_start = NaiveDate::from_ymd_opt(next_year, next_month, 1)?
            .and_hms_opt(0, 0, 0)?
            .and_utc();
        Some(Self {
            start,
            end: next_start - Duration::milliseconds(1),
        })
    }

    /// Range spanning from the first day of `start_month` through the last
    /// day of `end_month` in the given year. Used for the "all months"
    /// sentinel span.
    #[must_use]
    pub fn month_span(year: i32, start_month: MonthName, end_month: MonthName) -> Option<Self> {
        let start = Self::calendar_month(year, start_month)?.start;
        let end = Self::calendar_month(year, end_month)?.end;
        Some(Self { start, end })
    }

    #[must_use]
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.start && ts <= self.end
    }
}

/// Parsed form of the UI's raw month-selector string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonthSelection {
    /// Sentinel covering the whole configured span, e.g. `"All (Feb-May)"`.
    AllMonths,
    Named(MonthName),
    /// Anything else; matches no post.
    Unrecognized(String),
}

impl MonthSelection {
    /// A selection containing "all" (case-insensitive) is the sentinel;
    /// otherwise it must name an English month.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.to_ascii_lowercase().contains("all") {
            return MonthSelection::AllMonths;
        }
        match MonthName::parse(raw) {
            Some(month) => MonthSelection::Named(month),
            None => MonthSelection::Unrecognized(raw.to_string()),
        }
    }
}

/// The active dashboard filter: platform, raw month selection, and the
/// concrete date range derived from (or supplied alongside) it.
///
/// The range and the month name are checked independently downstream; a
/// caller may pair an arbitrary range with a named month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSelection {
    pub platform: Platform,
    pub selected_month: String,
    pub date_range: DateRange,
}

impl FilterSelection {
    /// Selection for a single named month of the given year.
    #[must_use]
    pub fn named_month(platform: Platform, month: MonthName, year: i32) -> Option<Self> {
        Some(Self {
            platform,
            selected_month: month.english().to_string(),
            date_range: DateRange::calendar_month(year, month)?,
        })
    }

    /// Selection covering the caller-supplied all-months span.
    #[must_use]
    pub fn all_months(platform: Platform, date_range: DateRange) -> Self {
        Self {
            platform,
            selected_month: "All".to_string(),
            date_range,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn month_index_round_trips() {
        for month in MonthName::ALL {
            assert_eq!(MonthName::from_index(month.index()), Some(month));
        }
    }

    #[test]
    fn from_index_rejects_out_of_range() {
        assert_eq!(MonthName::from_index(0), None);
        assert_eq!(MonthName::from_index(13), None);
    }

    #[test]
    fn month_of_timestamp() {
        assert_eq!(MonthName::of(utc("2024-03-15T00:00:00Z")), MonthName::March);
        assert_eq!(MonthName::of(utc("2024-12-31T23:59:59Z")), MonthName::December);
    }

    #[test]
    fn parse_month_case_insensitive() {
        assert_eq!(MonthName::parse("march"), Some(MonthName::March));
        assert_eq!(MonthName::parse(" MARCH "), Some(MonthName::March));
        assert_eq!(MonthName::parse("Marchx"), None);
    }

    #[test]
    fn calendar_month_covers_exactly_that_month() {
        let range = DateRange::calendar_month(2024, MonthName::February).unwrap();
        assert!(range.contains(utc("2024-02-01T00:00:00Z")));
        assert!(range.contains(utc("2024-02-29T23:59:59Z"))); // leap year
        assert!(!range.contains(utc("2024-03-01T00:00:00Z")));
        assert!(!range.contains(utc("2024-01-31T23:59:59Z")));
    }

    #[test]
    fn calendar_month_december_rolls_into_next_year() {
        let range = DateRange::calendar_month(2024, MonthName::December).unwrap();
        assert!(range.contains(utc("2024-12-31T23:59:59Z")));
        assert!(!range.contains(utc("2025-01-01T00:00:00Z")));
    }

    #[test]
    fn month_span_feb_through_may() {
        let range = DateRange::month_span(2024, MonthName::February, MonthName::May).unwrap();
        assert!(range.contains(utc("2024-02-01T00:00:00Z")));
        assert!(range.contains(utc("2024-05-31T23:59:59Z")));
        assert!(!range.contains(utc("2024-06-01T00:00:00Z")));
    }

    #[test]
    fn selection_all_sentinel() {
        assert_eq!(MonthSelection::parse("All (Feb-May)"), MonthSelection::AllMonths);
        assert_eq!(MonthSelection::parse("ALL"), MonthSelection::AllMonths);
    }

    #[test]
    fn selection_named_month() {
        assert_eq!(
            MonthSelection::parse("March"),
            MonthSelection::Named(MonthName::March)
        );
    }

    #[test]
    fn selection_unrecognized() {
        assert_eq!(
            MonthSelection::parse("Q3"),
            MonthSelection::Unrecognized("Q3".to_string())
        );
    }

    #[test]
    fn named_month_selection_derives_matching_range() {
        let selection =
            FilterSelection::named_month(Platform::Instagram, MonthName::March, 2024).unwrap();
        assert_eq!(selection.selected_month, "March");
        assert!(selection.date_range.contains(utc("2024-03-15T12:00:00Z")));
        assert!(!selection.date_range.contains(utc("2024-04-01T00:00:00Z")));
    }
}
