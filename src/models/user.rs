//! User model for storage and API.

use serde::{Deserialize, Serialize};

use crate::models::{Exercise, UserId};

/// User document as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned identifier (also used as document ID)
    #[serde(rename = "_id")]
    pub id: UserId,
    /// Unique, trimmed username
    pub username: String,
    /// Exercises in the order they were added
    #[serde(default)]
    pub log: Vec<Exercise>,
}

impl User {
    pub fn new(id: UserId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            log: Vec::new(),
        }
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id.clone(),
            username: self.username.clone(),
        }
    }
}

/// Identity projection returned by the user listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub username: String,
}
