//! Validated JSON request bodies.
//!
//! Malformed or semantically invalid payloads are rejected with a 400 before
//! any handler logic runs.

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use portal_core::models::api::LoginRequest;
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Longest password accepted at the door; bcrypt only reads the first 72 bytes.
const MAX_PASSWORD_LEN: usize = 1024;

/// Request schema check run after deserialization.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

/// `Json<T>` that also runs [`Validate::validate`].
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;
        value.validate().map_err(AppError::Validation)?;
        Ok(Self(value))
    }
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), String> {
        if !looks_like_email(self.email.trim()) {
            return Err("email must be a valid address".into());
        }
        if self.password.is_empty() {
            return Err("password is required".into());
        }
        if self.password.len() > MAX_PASSWORD_LEN {
            return Err("password is too long".into());
        }
        Ok(())
    }
}
