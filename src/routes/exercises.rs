// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exercise logging and log retrieval.

use crate::error::{AppError, Result};
use crate::models::UserId;
use crate::routes::payload::Fields;
use crate::services::log_query::{build_log_response, LogQuery, LogResponse};
use crate::services::validation::{validate_exercise, validate_user_id};
use crate::time_utils::format_calendar_date;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/users/{id}/exercises", post(add_exercise))
        .route("/api/users/{id}/logs", get(get_logs))
}

// ─── Add Exercise ────────────────────────────────────────────

/// Response for a logged exercise.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AddExerciseResponse {
    pub username: String,
    pub description: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub duration: i64,
    /// Calendar date, e.g. `Mon Jan 01 2024`
    pub date: String,
    #[serde(rename = "_id")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub id: UserId,
}

/// Append an exercise to a user's log.
///
/// An unknown user is reported before any field errors.
async fn add_exercise(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    fields: Fields,
) -> Result<Json<AddExerciseResponse>> {
    let user_id = validate_user_id(&raw_id)?;
    if state.store.find_user(&user_id).await?.is_none() {
        return Err(AppError::NotFound(AppError::USER_NOT_FOUND.to_string()));
    }

    let exercise = validate_exercise(
        fields.get("description"),
        fields.get("duration"),
        fields.get("date"),
        state.clock.as_ref(),
    )?;

    let user = state
        .store
        .append_exercise(&user_id, exercise.clone())
        .await?
        .ok_or_else(|| AppError::NotFound(AppError::USER_NOT_FOUND.to_string()))?;

    tracing::info!(
        user_id = %user.id,
        duration = exercise.duration,
        date = %exercise.date,
        "Exercise logged"
    );

    Ok(Json(AddExerciseResponse {
        username: user.username,
        description: exercise.description,
        duration: exercise.duration,
        date: format_calendar_date(exercise.date),
        id: user.id,
    }))
}

// ─── Exercise Log ────────────────────────────────────────────

/// Get a user's exercise log, optionally filtered by `from`, `to` and `limit`.
async fn get_logs(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<LogResponse>> {
    let user_id = validate_user_id(&raw_id)?;
    let query = LogQuery::from_pairs(pairs);

    tracing::debug!(
        user_id = %user_id,
        from = ?query.from,
        to = ?query.to,
        limit = ?query.limit,
        "Fetching exercise log"
    );

    let user = state
        .store
        .find_user(&user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(AppError::USER_NOT_FOUND.to_string()))?;

    Ok(Json(build_log_response(&user, &query)))
}
