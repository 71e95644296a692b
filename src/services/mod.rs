// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - validation and log query logic.

pub mod log_query;
pub mod validation;

pub use log_query::{build_log_response, LogFilter, LogQuery, LogResponse};
