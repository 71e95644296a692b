// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Process-local user store.
//!
//! Used for local development and tests. Data lives only as long as the
//! process.

use crate::db::UserStore;
use crate::error::AppError;
use crate::models::{Exercise, User, UserId, UserSummary};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// In-memory store backed by concurrent maps.
#[derive(Default)]
pub struct InMemoryStore {
    users: DashMap<UserId, User>,
    /// Username -> owning user ID
    usernames: DashMap<String, UserId>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered users.
    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn create_user(&self, username: &str) -> Result<User, AppError> {
        // The entry guard is held until the user is inserted, so concurrent
        // registrations of one name cannot both succeed.
        match self.usernames.entry(username.to_string()) {
            Entry::Occupied(_) => Err(AppError::Conflict(AppError::USERNAME_TAKEN.to_string())),
            Entry::Vacant(slot) => {
                let user = User::new(UserId::generate(chrono::Utc::now()), username);
                self.users.insert(user.id.clone(), user.clone());
                slot.insert(user.id.clone());
                tracing::debug!(user_id = %user.id, username, "User created");
                Ok(user)
            }
        }
    }

    async fn find_user(&self, id: &UserId) -> Result<Option<User>, AppError> {
        Ok(self.users.get(id).map(|user| user.clone()))
    }

    async fn list_users(&self) -> Result<Vec<UserSummary>, AppError> {
        let mut summaries: Vec<UserSummary> =
            self.users.iter().map(|entry| entry.summary()).collect();
        // IDs are time-prefixed, so ID order is creation order.
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(summaries)
    }

    async fn append_exercise(
        &self,
        id: &UserId,
        exercise: Exercise,
    ) -> Result<Option<User>, AppError> {
        Ok(self.users.get_mut(id).map(|mut user| {
            user.log.push(exercise);
            user.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    fn exercise(description: &str) -> Exercise {
        Exercise {
            description: description.to_string(),
            duration: 15,
            date: Utc.with_ymd_and_hms(2024, 2, 2, 0, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let store = InMemoryStore::new();
        store.create_user("alice").await.unwrap();

        let err = store.create_user("alice").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref msg) if msg == "Username already taken"));
        assert_eq!(store.user_count(), 1);
    }

    #[tokio::test]
    async fn test_usernames_are_case_sensitive() {
        let store = InMemoryStore::new();
        store.create_user("alice").await.unwrap();
        assert!(store.create_user("Alice").await.is_ok());
    }

    #[tokio::test]
    async fn test_find_unknown_user() {
        let store = InMemoryStore::new();
        let id = UserId::parse("000000000000000000000000").unwrap();
        assert!(store.find_user(&id).await.unwrap().is_none());
        assert!(store
            .append_exercise(&id, exercise("noop"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_append_preserves_insertion_order() {
        let store = InMemoryStore::new();
        let user = store.create_user("bob").await.unwrap();

        for name in ["first", "second", "third"] {
            store.append_exercise(&user.id, exercise(name)).await.unwrap();
        }

        let stored = store.find_user(&user.id).await.unwrap().unwrap();
        let names: Vec<_> = stored.log.iter().map(|e| e.description.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_list_users_in_creation_order() {
        let store = InMemoryStore::new();
        for name in ["carol", "dave", "erin"] {
            store.create_user(name).await.unwrap();
        }

        let names: Vec<_> = store
            .list_users()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(names, vec!["carol", "dave", "erin"]);
    }

    #[tokio::test]
    async fn test_concurrent_registration_single_winner() {
        let store = Arc::new(InMemoryStore::new());
        let mut handles = vec![];
        for _ in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(
                async move { store.create_user("racer").await },
            ));
        }

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }
        assert_eq!(successes, 1);
        assert_eq!(store.user_count(), 1);
    }
}
