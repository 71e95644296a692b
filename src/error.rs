// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Client-supplied data failed a validation rule.
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    /// Duplicate unique key (username).
    #[error("{0}")]
    Conflict(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub const USERNAME_REQUIRED: &'static str = "Username is required";
    pub const USERNAME_TAKEN: &'static str = "Username already taken";
    pub const INVALID_USER_ID: &'static str = "Invalid user ID";
    pub const USER_NOT_FOUND: &'static str = "User not found";
    pub const DESCRIPTION_REQUIRED: &'static str = "Description is required";
    pub const INVALID_DURATION: &'static str = "Duration must be a positive number";
    pub const INVALID_DATE: &'static str = "Invalid date format";
    pub const INVALID_BODY: &'static str = "Invalid request body";
    pub const SERVER_ERROR: &'static str = "Server error";

    pub fn invalid_input(msg: &str) -> Self {
        AppError::InvalidInput(msg.to_string())
    }

    /// HTTP status this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match self {
            AppError::InvalidInput(msg) | AppError::NotFound(msg) | AppError::Conflict(msg) => {
                tracing::debug!(status = status.as_u16(), error = %msg, "Request rejected");
                msg
            }
            AppError::Store(msg) => {
                tracing::error!(error = %msg, "Store error");
                AppError::SERVER_ERROR.to_string()
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                AppError::SERVER_ERROR.to_string()
            }
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
