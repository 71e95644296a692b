//! Storage layer.
//!
//! Handlers depend only on the [`UserStore`] port; the backing store is
//! chosen at startup.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreStore;
pub use memory::InMemoryStore;

use crate::error::AppError;
use crate::models::{Exercise, User, UserId, UserSummary};
use async_trait::async_trait;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Username reservations (keyed by encoded username) enforcing uniqueness
    pub const USERNAMES: &str = "usernames";
}

/// Persistence operations the API needs.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create a user with a store-assigned ID.
    ///
    /// Fails with [`AppError::Conflict`] if the username is taken.
    async fn create_user(&self, username: &str) -> Result<User, AppError>;

    async fn find_user(&self, id: &UserId) -> Result<Option<User>, AppError>;

    /// All users, in creation order.
    async fn list_users(&self) -> Result<Vec<UserSummary>, AppError>;

    /// Append an exercise to a user's log.
    ///
    /// Returns the updated user, or `None` if the user does not exist.
    async fn append_exercise(
        &self,
        id: &UserId,
        exercise: Exercise,
    ) -> Result<Option<User>, AppError>;
}
