// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Request field validation.
//!
//! Every check here runs before the store is touched. Inputs are raw
//! JSON values because fields arrive either as typed JSON or as
//! url-encoded strings.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::clock::Clock;
use crate::error::{AppError, Result};
use crate::models::{Exercise, UserId};
use crate::time_utils::parse_date;

/// Validate a username. Returns the trimmed value.
pub fn validate_username(input: Option<&Value>) -> Result<String> {
    required_text(input, AppError::USERNAME_REQUIRED)
}

/// Validate a user ID path segment before any lookup.
pub fn validate_user_id(input: &str) -> Result<UserId> {
    UserId::parse(input).ok_or_else(|| AppError::invalid_input(AppError::INVALID_USER_ID))
}

/// Validate an exercise description. Returns the trimmed value.
pub fn validate_description(input: Option<&Value>) -> Result<String> {
    required_text(input, AppError::DESCRIPTION_REQUIRED)
}

/// Validate an exercise duration.
///
/// Parsing is lenient: a numeric prefix is enough, so `"45min"` is 45.
pub fn validate_duration(input: Option<&Value>) -> Result<i64> {
    let parsed = match input {
        Some(Value::Number(n)) => n.as_i64().or_else(|| {
            // Fractions and out-of-range values go through their text form.
            n.as_f64().and_then(|f| parse_int_prefix(&f.to_string()))
        }),
        Some(Value::String(s)) => parse_int_prefix(s),
        _ => None,
    };

    match parsed {
        Some(duration) if duration > 0 => Ok(duration),
        _ => Err(AppError::invalid_input(AppError::INVALID_DURATION)),
    }
}

/// Validate an exercise date, defaulting to `clock.now()` when absent.
///
/// Numbers are milliseconds since the Unix epoch; strings go through
/// [`parse_date`].
pub fn validate_date(input: Option<&Value>, clock: &dyn Clock) -> Result<DateTime<Utc>> {
    let invalid = || AppError::invalid_input(AppError::INVALID_DATE);

    match input {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(clock.now()),
        Some(Value::String(s)) if s.is_empty() => Ok(clock.now()),
        Some(Value::String(s)) => parse_date(s).ok_or_else(invalid),
        Some(Value::Number(n)) => {
            let millis = n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
                .ok_or_else(invalid)?;
            if millis == 0 {
                return Ok(clock.now());
            }
            DateTime::from_timestamp_millis(millis).ok_or_else(invalid)
        }
        Some(_) => Err(invalid()),
    }
}

/// Validate all exercise fields, in order: description, duration, date.
pub fn validate_exercise(
    description: Option<&Value>,
    duration: Option<&Value>,
    date: Option<&Value>,
    clock: &dyn Clock,
) -> Result<Exercise> {
    Ok(Exercise {
        description: validate_description(description)?,
        duration: validate_duration(duration)?,
        date: validate_date(date, clock)?,
    })
}

/// Parse the leading integer of a string.
///
/// Skips leading whitespace, accepts one sign and an optional `0x`
/// prefix, then reads digits up to the first non-digit. Returns `None`
/// if no digits were read. Values too large for `i64` saturate.
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let (radix, digits) = match rest.get(..2) {
        Some("0x") | Some("0X") => (16, &rest[2..]),
        _ => (10, rest),
    };

    let end = digits
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    // Only overflow can fail here.
    let magnitude = i64::from_str_radix(&digits[..end], radix).unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

fn required_text(input: Option<&Value>, message: &str) -> Result<String> {
    match input {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(AppError::invalid_input(message)),
    }
}
