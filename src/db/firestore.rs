// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore-backed user store.
//!
//! Layout:
//! - `users/{user_id}`: the user document, log embedded
//! - `usernames/{encoded username}`: reservation pointing at the owner
//!
//! Username uniqueness relies on Firestore rejecting a create for an
//! existing document ID. Appends run in a transaction.

use crate::db::{collections, UserStore};
use crate::error::AppError;
use crate::models::{Exercise, User, UserId, UserSummary};
use async_trait::async_trait;
use firestore::errors::FirestoreError;
use futures_util::FutureExt;
use serde::{Deserialize, Serialize};

/// Username reservation document.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct UsernameReservation {
    user_id: UserId,
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreStore {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreStore {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Store(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| AppError::Store(format!("Failed to connect to Firestore Emulator: {}", e)))?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create an offline client. Every operation fails with a store error.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Store("Database not connected (offline mode)".to_string()))
    }

    async fn release_username(&self, username: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::USERNAMES)
            .document_id(username_doc_id(username))
            .execute()
            .await
            .map_err(|e| AppError::Store(e.to_string()))
    }
}

/// Document ID for a username reservation.
///
/// Encoded so arbitrary usernames form valid document IDs; the prefix
/// keeps IDs clear of the reserved `.`, `..` and `__*__` forms.
fn username_doc_id(username: &str) -> String {
    format!("u_{}", urlencoding::encode(username))
}

#[async_trait]
impl UserStore for FirestoreStore {
    async fn create_user(&self, username: &str) -> Result<User, AppError> {
        let client = self.get_client()?;
        let user = User::new(UserId::generate(chrono::Utc::now()), username);

        let reservation = UsernameReservation {
            user_id: user.id.clone(),
        };
        let _: UsernameReservation = client
            .fluent()
            .insert()
            .into(collections::USERNAMES)
            .document_id(username_doc_id(username))
            .object(&reservation)
            .execute()
            .await
            .map_err(|e| match e {
                FirestoreError::DataConflictError(_) => {
                    AppError::Conflict(AppError::USERNAME_TAKEN.to_string())
                }
                other => AppError::Store(other.to_string()),
            })?;

        let inserted: Result<User, _> = client
            .fluent()
            .insert()
            .into(collections::USERS)
            .document_id(user.id.as_str())
            .object(&user)
            .execute()
            .await;

        if let Err(e) = inserted {
            // Don't leave the name reserved for a user that was never written.
            if let Err(release_err) = self.release_username(username).await {
                tracing::warn!(
                    error = %release_err,
                    username,
                    "Failed to release username after user insert failed"
                );
            }
            return Err(AppError::Store(e.to_string()));
        }

        tracing::info!(user_id = %user.id, username, "User created");
        Ok(user)
    }

    async fn find_user(&self, id: &UserId) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(id.as_str())
            .await
            .map_err(|e| AppError::Store(e.to_string()))
    }

    async fn list_users(&self) -> Result<Vec<UserSummary>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .fields(["_id", "username"])
            .from(collections::USERS)
            // IDs are time-prefixed, so this is creation order
            .order_by([("_id", firestore::FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Store(e.to_string()))
    }

    async fn append_exercise(
        &self,
        id: &UserId,
        exercise: Exercise,
    ) -> Result<Option<User>, AppError> {
        let doc_id = id.as_str().to_string();

        // Read and write share one transaction; a commit that conflicts
        // with another append is retried against the fresh document.
        let updated: Option<User> = self
            .get_client()?
            .run_transaction(|db, transaction| {
                let doc_id = doc_id.clone();
                let exercise = exercise.clone();
                async move {
                    let current: Option<User> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::USERS)
                        .obj()
                        .one(&doc_id)
                        .await?;

                    let Some(mut user) = current else {
                        return Ok(None);
                    };
                    user.log.push(exercise);

                    db.fluent()
                        .update()
                        .in_col(collections::USERS)
                        .document_id(&doc_id)
                        .object(&user)
                        .add_to_transaction(transaction)?;

                    Ok(Some(user))
                }
                .boxed()
            })
            .await
            .map_err(|e| AppError::Store(format!("Append transaction failed: {}", e)))?;

        let Some(user) = updated else {
            return Ok(None);
        };

        tracing::debug!(
            user_id = %user.id,
            log_len = user.log.len(),
            "Exercise appended"
        );
        Ok(Some(user))
    }
}
