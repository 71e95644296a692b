// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Exercise log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One logged activity, owned by a user's log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub description: String,
    /// Minutes by convention; always positive.
    pub duration: i64,
    pub date: DateTime<Utc>,
}
