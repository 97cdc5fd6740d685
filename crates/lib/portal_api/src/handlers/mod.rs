//! Request handlers.

pub mod auth;
pub mod health;
pub mod user;

use crate::error::AppError;

/// Fallback for unknown `/api/*` paths.
pub async fn api_not_found() -> AppError {
    AppError::NotFound("no such endpoint".into())
}
