// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// No session cookie, or a session that failed verification.
    #[error("Authentication required")]
    Unauthenticated,

    /// Session token failed signature, algorithm or expiry checks.
    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Identity not found: {0}")]
    IdentityNotFound(String),

    #[error("No email address found for identity {0}")]
    MissingEmail(String),

    #[error("Identity provider unavailable: {0}")]
    IdentityProviderUnavailable(String),

    #[error("Upload authorization failed: {0}")]
    UploadAuthorizationFailed(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Message returned for every 5xx response.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl AppError {
    /// HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) | AppError::IdentityNotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::MissingEmail(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::IdentityProviderUnavailable(_)
            | AppError::UploadAuthorizationFailed(_)
            | AppError::Database(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable code included in the response body.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthenticated | AppError::InvalidToken => "UNAUTHORIZED",
            AppError::NotFound(_) | AppError::IdentityNotFound(_) => "NOT_FOUND",
            AppError::BadRequest(_) | AppError::MissingEmail(_) => "BAD_REQUEST",
            AppError::Conflict(_) => "CONFLICT",
            _ => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match &self {
            // Authentication failures all look the same to the client.
            AppError::Unauthenticated | AppError::InvalidToken => {
                "Not authenticated".to_string()
            }
            AppError::NotFound(msg) | AppError::BadRequest(msg) | AppError::Conflict(msg) => {
                msg.clone()
            }
            AppError::IdentityNotFound(_) => "Identity provider user not found".to_string(),
            AppError::MissingEmail(_) => {
                "No email address found for identity provider user".to_string()
            }
            AppError::IdentityProviderUnavailable(msg) => {
                tracing::error!(error = %msg, "Identity provider error");
                UNEXPECTED_ERROR_MESSAGE.to_string()
            }
            AppError::UploadAuthorizationFailed(msg) => {
                tracing::error!(error = %msg, "Upload authorization error");
                UNEXPECTED_ERROR_MESSAGE.to_string()
            }
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                UNEXPECTED_ERROR_MESSAGE.to_string()
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                UNEXPECTED_ERROR_MESSAGE.to_string()
            }
        };

        let body = ErrorResponse {
            error: self.code().to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::BadRequest(errors.to_string())
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
