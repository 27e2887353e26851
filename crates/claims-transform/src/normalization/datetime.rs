//! Admission and discharge date parsing.
//!
//! Source files mix US and European layouts. Parsing runs two passes:
//! the first assumes month-before-day, the second day-before-month. The
//! unambiguous layouts (year first, month names) are accepted in the first
//! pass. A trailing time of day is ignored.

use chrono::{Datelike, NaiveDate};
use tracing::warn;

/// Layouts that never depend on day/month ordering.
const UNAMBIGUOUS_FORMATS: [&str; 20] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%Y%m%d",
    "%d-%b-%Y", // 15-Jan-2024
    "%d %b %Y", // 15 Jan 2024
    "%b %d, %Y", // Jan 15, 2024
    "%b %d %Y",
    "%d-%b-%y",
    "%d %b %y",
    "%Y-%b-%d",
    "%b-%d-%Y",
    "%d-%B-%Y", // 15-January-2024
    "%d %B %Y", // 15 January 2024
    "%B %d, %Y", // January 15, 2024
    "%B %d %Y",
    "%d-%B-%y",
    "%d %B %y",
    "%Y-%B-%d",
    "%B-%d-%Y",
];

/// Month-before-day layouts. Two-digit years come first so `%Y` does not
/// swallow them as years in the first century.
const MONTH_FIRST_FORMATS: [&str; 6] = [
    "%m/%d/%y",
    "%m-%d-%y",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%m.%d.%Y",
    "%m.%d.%y",
];

/// Day-before-month layouts, tried only after every month-first layout failed.
const DAY_FIRST_FORMATS: [&str; 6] = [
    "%d/%m/%y",
    "%d-%m-%y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d.%m.%y",
];

/// Earliest year accepted as a real calendar date.
const MIN_PLAUSIBLE_YEAR: i32 = 1000;

/// Ordering assumed for ambiguous numeric dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DayOrder {
    MonthFirst,
    DayFirst,
}

/// Parses an admission/discharge date.
///
/// Returns `None` silently for blank input and with a warning when neither
/// ordering produces a valid date.
pub fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let date_part = strip_time(trimmed);
    let parsed = parse_with_order(date_part, DayOrder::MonthFirst)
        .or_else(|| parse_with_order(date_part, DayOrder::DayFirst));
    if parsed.is_none() {
        warn!(value = %raw, "invalid date encountered");
    }
    parsed
}

/// Parses a date assuming the given ordering for ambiguous layouts.
pub(crate) fn parse_with_order(value: &str, order: DayOrder) -> Option<NaiveDate> {
    let (unambiguous, ordered): (&[&str], &[&str]) = match order {
        DayOrder::MonthFirst => (&UNAMBIGUOUS_FORMATS, &MONTH_FIRST_FORMATS),
        DayOrder::DayFirst => (&[], &DAY_FIRST_FORMATS),
    };
    for fmt in unambiguous.iter().chain(ordered) {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt)
            && date.year() >= MIN_PLAUSIBLE_YEAR
        {
            return Some(date);
        }
    }
    None
}

/// Drops a trailing time component (`2024-01-15T10:30`, `01/15/2024 10:30`,
/// `01/15/2024 10:30 AM`).
fn strip_time(value: &str) -> &str {
    let value = match value.rsplit_once(' ') {
        Some((rest, meridiem))
            if meridiem.eq_ignore_ascii_case("am") || meridiem.eq_ignore_ascii_case("pm") =>
        {
            rest.trim_end()
        }
        _ => value,
    };
    if let Some((date, time)) = value.split_once('T')
        && time.starts_with(|c: char| c.is_ascii_digit())
        && time.contains(':')
    {
        return date.trim();
    }
    if let Some((date, time)) = value.rsplit_once(' ')
        && time.contains(':')
    {
        return date.trim();
    }
    value
}
