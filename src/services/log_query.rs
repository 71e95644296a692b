// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exercise log filtering and response shaping.
//!
//! Filters run in a fixed order: `from`, then `to`, then `limit`, so the
//! limit bounds the date-filtered set rather than the stored log.
//! Parameters that do not parse are skipped, never rejected.

use chrono::{DateTime, Utc};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::{Exercise, User, UserId};
use crate::services::validation::parse_int_prefix;
use crate::time_utils::{format_calendar_date, parse_date};

/// Raw query parameters for `GET /api/users/:_id/logs`.
#[derive(Debug, Clone, Default)]
pub struct LogQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<String>,
}

impl LogQuery {
    /// Collect parameters from decoded query pairs.
    ///
    /// A key given more than once has its values joined with `,`, so
    /// `limit=1&limit=2` reads as `"1,2"`. Unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "from" => &mut query.from,
                "to" => &mut query.to,
                "limit" => &mut query.limit,
                _ => continue,
            };
            let value = value.into();
            match slot {
                Some(existing) => {
                    existing.push(',');
                    existing.push_str(&value);
                }
                None => *slot = Some(value),
            }
        }
        query
    }
}

/// Filters resolved from a [`LogQuery`]. `None` means "skip this step".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogFilter {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
}

impl From<&LogQuery> for LogFilter {
    fn from(query: &LogQuery) -> Self {
        let date = |raw: &Option<String>| raw.as_deref().and_then(parse_date);
        Self {
            from: date(&query.from),
            to: date(&query.to),
            limit: query.limit.as_deref().and_then(parse_int_prefix),
        }
    }
}

impl LogFilter {
    /// Apply the filter to a log, keeping stored order.
    pub fn apply<'a>(&self, log: &'a [Exercise]) -> Vec<&'a Exercise> {
        let mut entries: Vec<&Exercise> = log.iter().collect();

        if let Some(from) = self.from {
            entries.retain(|e| e.date >= from);
        }
        if let Some(to) = self.to {
            entries.retain(|e| e.date <= to);
        }
        if let Some(limit) = self.limit {
            entries.truncate(limit_end(limit, entries.len()));
        }

        entries
    }
}

/// End index for a limit. Negative limits count back from the end.
fn limit_end(limit: i64, len: usize) -> usize {
    let magnitude = usize::try_from(limit.unsigned_abs()).unwrap_or(usize::MAX);
    if limit >= 0 {
        magnitude.min(len)
    } else {
        len.saturating_sub(magnitude)
    }
}

/// One entry of the log response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LogEntry {
    pub description: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub duration: i64,
    /// Calendar date, e.g. `Mon Jan 01 2024`
    pub date: String,
}

impl From<&Exercise> for LogEntry {
    fn from(exercise: &Exercise) -> Self {
        Self {
            description: exercise.description.clone(),
            duration: exercise.duration,
            date: format_calendar_date(exercise.date),
        }
    }
}

/// Response body for `GET /api/users/:_id/logs`.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LogResponse {
    pub username: String,
    #[serde(rename = "_id")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub id: UserId,
    pub count: usize,
    pub log: Vec<LogEntry>,
}

/// Filter a user's log and shape it for the API.
pub fn build_log_response(user: &User, query: &LogQuery) -> LogResponse {
    let filter = LogFilter::from(query);
    let log: Vec<LogEntry> = filter
        .apply(&user.log)
        .into_iter()
        .map(LogEntry::from)
        .collect();

    LogResponse {
        username: user.username.clone(),
        id: user.id.clone(),
        count: log.len(),
        log,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn exercise(description: &str, y: i32, m: u32, d: u32) -> Exercise {
        Exercise {
            description: description.to_string(),
            duration: 30,
            date: Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap(),
        }
    }

    fn test_user() -> User {
        let mut user = User::new(
            UserId::parse("65a1b2c3d4e5f60718293a4b").unwrap(),
            "alice",
        );
        user.log = vec![
            exercise("early", 2023, 1, 1),
            exercise("middle", 2023, 1, 15),
            exercise("late", 2023, 2, 1),
        ];
        user
    }

    fn query(from: Option<&str>, to: Option<&str>, limit: Option<&str>) -> LogQuery {
        LogQuery {
            from: from.map(String::from),
            to: to.map(String::from),
            limit: limit.map(String::from),
        }
    }

    fn descriptions(response: &LogResponse) -> Vec<&str> {
        response
            .log
            .iter()
            .map(|e| e.description.as_str())
            .collect()
    }

    #[test]
    fn test_no_filters_returns_full_log() {
        let response = build_log_response(&test_user(), &LogQuery::default());
        assert_eq!(response.count, 3);
        assert_eq!(descriptions(&response), vec!["early", "middle", "late"]);
        assert_eq!(response.username, "alice");
    }

    #[test]
    fn test_from_and_to_compose() {
        let response = build_log_response(
            &test_user(),
            &query(Some("2023-01-10"), Some("2023-01-31"), None),
        );
        assert_eq!(descriptions(&response), vec!["middle"]);
        assert_eq!(response.count, 1);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let response = build_log_response(
            &test_user(),
            &query(Some("2023-01-15"), Some("2023-01-15"), None),
        );
        assert_eq!(descriptions(&response), vec!["middle"]);
    }

    #[test]
    fn test_limit_applies_after_date_filter() {
        let response = build_log_response(&test_user(), &query(Some("2023-01-10"), None, Some("1")));
        assert_eq!(descriptions(&response), vec!["middle"]);
    }

    #[test]
    fn test_limit_keeps_stored_order_not_date_order() {
        let mut user = test_user();
        user.log.reverse();
        let response = build_log_response(&user, &query(None, None, Some("2")));
        assert_eq!(descriptions(&response), vec!["late", "middle"]);
    }

    #[test]
    fn test_unparseable_params_are_ignored() {
        let response = build_log_response(
            &test_user(),
            &query(Some("garbage"), Some(""), Some("many")),
        );
        assert_eq!(response.count, 3);
    }

    #[test]
    fn test_limit_edge_values() {
        let user = test_user();
        assert_eq!(build_log_response(&user, &query(None, None, Some("0"))).count, 0);
        assert_eq!(build_log_response(&user, &query(None, None, Some("10"))).count, 3);
        assert_eq!(build_log_response(&user, &query(None, None, Some("2abc"))).count, 2);
        let negative = build_log_response(&user, &query(None, None, Some("-1")));
        assert_eq!(descriptions(&negative), vec!["early", "middle"]);
        assert_eq!(build_log_response(&user, &query(None, None, Some("-9"))).count, 0);
    }

    #[test]
    fn test_from_pairs_joins_repeated_keys() {
        let parsed = LogQuery::from_pairs([
            ("limit", "1"),
            ("from", "2023-01-10"),
            ("limit", "2"),
            ("sort", "desc"),
        ]);
        assert_eq!(parsed.limit.as_deref(), Some("1,2"));
        assert_eq!(parsed.from.as_deref(), Some("2023-01-10"));
        assert_eq!(parsed.to, None);

        let filter = LogFilter::from(&parsed);
        assert_eq!(filter.limit, Some(1));
    }

    #[test]
    fn test_repeated_date_is_skipped() {
        let parsed = LogQuery::from_pairs([("from", "2023-01-10"), ("from", "2023-02-01")]);
        assert_eq!(LogFilter::from(&parsed).from, None);
        assert_eq!(build_log_response(&test_user(), &parsed).count, 3);
    }

    #[test]
    fn test_entries_are_reshaped() {
        let response = build_log_response(&test_user(), &LogQuery::default());
        assert_eq!(
            response.log[0],
            LogEntry {
                description: "early".to_string(),
                duration: 30,
                date: "Sun Jan 01 2023".to_string(),
            }
        );
    }

    #[test]
    fn test_response_serialization_shape() {
        let response = build_log_response(&test_user(), &query(None, None, Some("1")));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "username": "alice",
                "_id": "65a1b2c3d4e5f60718293a4b",
                "count": 1,
                "log": [{"description": "early", "duration": 30, "date": "Sun Jan 01 2023"}]
            })
        );
    }
}
