// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User registration and listing.

use crate::error::Result;
use crate::models::{UserId, UserSummary};
use crate::routes::payload::Fields;
use crate::services::validation::validate_username;
use crate::AppState;
use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/users", post(create_user).get(list_users))
}

/// Response for a newly created user.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CreateUserResponse {
    pub username: String,
    #[serde(rename = "_id")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub id: UserId,
}

/// Register a new user.
async fn create_user(
    State(state): State<Arc<AppState>>,
    fields: Fields,
) -> Result<Json<CreateUserResponse>> {
    let username = validate_username(fields.get("username"))?;

    let user = state.store.create_user(&username).await?;
    tracing::info!(user_id = %user.id, username = %user.username, "Registered user");

    Ok(Json(CreateUserResponse {
        username: user.username,
        id: user.id,
    }))
}

/// List all users as `{_id, username}`.
async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<UserSummary>>> {
    let users = state.store.list_users().await?;
    tracing::debug!(count = users.len(), "Listed users");
    Ok(Json(users))
}
