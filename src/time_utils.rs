// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date parsing and formatting.
//!
//! Dates without an explicit offset are interpreted as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Naive date-time layouts, tried in order.
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Date-only layouts, tried in order. All resolve to UTC midnight.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%a %b %d %Y",
    "%b %d %Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%m/%d/%Y",
];

/// Calendar-date rendering used in API responses, e.g. `Mon Jan 01 2024`.
const CALENDAR_DATE_FORMAT: &str = "%a %b %d %Y";

/// Parse a user-supplied date string.
///
/// Returns `None` for anything that is not a recognised date.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Some(dt) = DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt.and_utc());
    }

    // Year only: first of January.
    if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
        return midnight(NaiveDate::from_ymd_opt(s.parse().ok()?, 1, 1)?);
    }

    // Year-month only: first of the month.
    if s.len() == 7 && s.as_bytes()[4] == b'-' {
        return midnight(NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d").ok()?);
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(midnight)
}

fn midnight(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc())
}

/// Format a UTC timestamp as a calendar date (`Mon Jan 01 2024`).
pub fn format_calendar_date(date: DateTime<Utc>) -> String {
    date.format(CALENDAR_DATE_FORMAT).to_string()
}
