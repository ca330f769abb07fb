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
    #[error("Authentication required")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Stored credentials are unreadable: {0}")]
    CorruptCredentials(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Invalid token response: {0}")]
    InvalidResponse(String),

    #[error("No refresh token available, re-authorization required")]
    MissingRefreshToken,

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Not an image: {0}")]
    NotAnImage(String),

    #[error("Image processing error: {0}")]
    Image(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Whether this error means the user has to go through the OAuth flow again.
    pub fn requires_reauthorization(&self) -> bool {
        matches!(
            self,
            AppError::NotFound(_) | AppError::CorruptCredentials(_) | AppError::MissingRefreshToken
        )
    }
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
            AppError::NotFound(msg) | AppError::CorruptCredentials(msg) => {
                (StatusCode::NOT_FOUND, "not_found", Some(msg.clone()))
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            // Upstream details stay in the logs
            AppError::InvalidResponse(_)
            | AppError::MissingRefreshToken
            | AppError::Provider(_)
            | AppError::Network(_)
            | AppError::NotAnImage(_)
            | AppError::Image(_) => {
                tracing::warn!(error = %self, "Upstream request failed");
                (StatusCode::BAD_REQUEST, "upstream_error", None)
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
