//! Auth gate: session token extraction and verification.
//!
//! The token is taken from the `token` cookie first and from an
//! `Authorization: Bearer <token>` header second. No token is a 401; a token
//! that fails verification is a 403.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use portal_core::auth::AuthError;
use portal_core::auth::jwt::verify_session_token;
use portal_core::models::auth::Identity;
use tracing::debug;

use crate::AppState;
use crate::error::AppError;
use crate::services::cookies::SESSION_COOKIE;

/// Identity attached to the request by [`require_auth`].
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Identity);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| AppError::from(AuthError::MissingToken))
    }
}

/// Pull the session token out of the request, cookie before header.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE)
        && !cookie.value().is_empty()
    {
        return Some(cookie.value().to_string());
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Axum middleware: verifies the session token and injects
/// [`AuthenticatedUser`] into request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(request.headers()).ok_or_else(|| {
        debug!(path = %request.uri().path(), "auth gate: no token");
        AuthError::MissingToken
    })?;

    let claims = verify_session_token(&token, state.config.jwt_secret.as_bytes()).map_err(|e| {
        debug!(path = %request.uri().path(), "auth gate: {e}");
        e
    })?;

    request
        .extensions_mut()
        .insert(AuthenticatedUser(claims.identity()));

    Ok(next.run(request).await)
}
