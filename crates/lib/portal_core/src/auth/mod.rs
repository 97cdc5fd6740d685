//! Authentication logic.
//!
//! Provides password hashing, session token issuance/verification, and the
//! credential store that `portal_api` authenticates against.

pub mod jwt;
pub mod password;
pub mod store;

use thiserror::Error;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email or wrong password. Deliberately carries no detail.
    #[error("Invalid credentials")]
    CredentialError,

    /// No session token was presented.
    #[error("No token provided")]
    MissingToken,

    /// Token is malformed or its signature does not verify.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Token signature is fine but its expiry instant has passed.
    #[error("Token expired")]
    ExpiredToken,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// True for failures caused by a presented-but-unusable token.
    pub fn is_invalid_token(&self) -> bool {
        matches!(self, AuthError::InvalidToken(_) | AuthError::ExpiredToken)
    }
}
