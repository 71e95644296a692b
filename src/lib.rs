// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Exercise Tracker: a small REST API for logging exercises.
//!
//! Clients register users, append exercises to a user's log, and read
//! back the log filtered by date range and count.

pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use clock::Clock;
use config::Config;
use db::UserStore;
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn UserStore>,
    pub clock: Arc<dyn Clock>,
}
