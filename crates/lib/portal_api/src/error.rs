//! Application error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use portal_core::auth::AuthError;
use portal_core::models::api::ErrorResponse;
use thiserror::Error;
use tracing::error;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Message for every failed login, whatever the cause.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// No credential presented, or credentials rejected.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Credential presented but unusable (bad signature, malformed, expired).
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The request ran past the server's deadline.
    #[error("Request timed out")]
    Timeout,

    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, &str) {
        match self {
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, "validation_error", m.as_str()),
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, "not_found", m.as_str()),
            AppError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, "unauthorized", m.as_str()),
            AppError::Forbidden(m) => (StatusCode::FORBIDDEN, "forbidden", m.as_str()),
            AppError::Timeout => (
                StatusCode::REQUEST_TIMEOUT,
                "timeout",
                "Request timed out",
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Internal server error",
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Internal(detail) = &self {
            error!(%detail, "request failed");
        }
        let (status, code, message) = self.parts();
        let body = Json(ErrorResponse {
            success: false,
            error: message.to_string(),
            code: code.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::CredentialError => AppError::Unauthorized(INVALID_CREDENTIALS.into()),
            AuthError::MissingToken => AppError::Unauthorized("No token provided".into()),
            AuthError::InvalidToken(_) | AuthError::ExpiredToken => {
                AppError::Forbidden("Invalid or expired token".into())
            }
            AuthError::ValidationError(msg) => AppError::Validation(msg),
            AuthError::Internal(msg) => AppError::Internal(msg),
        }
    }
}
