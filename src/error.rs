// SPDX-License-Identifier: MIT

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
    #[error("Authentication required")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Duplicate submission: {0}")]
    DuplicateSubmission(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Transient storage error: {0}")]
    Transient(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", Some(msg.clone())),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::Validation(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                Some(msg.clone()),
            ),
            AppError::DuplicateSubmission(msg) => (
                StatusCode::CONFLICT,
                "duplicate_submission",
                Some(msg.clone()),
            ),
            AppError::InvalidState(msg) => {
                (StatusCode::CONFLICT, "invalid_state", Some(msg.clone()))
            }
            AppError::InvalidStatus(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_status", Some(msg.clone()))
            }
            AppError::Transient(msg) => {
                // Retriable: the admin UI is expected to retry the review.
                tracing::warn!(error = %msg, "Transient storage error");
                (StatusCode::SERVICE_UNAVAILABLE, "transient_error", None)
            }
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
