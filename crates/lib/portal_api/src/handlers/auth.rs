//! Authentication request handlers.

use axum::Json;
use axum::extract::State;
use axum_extra::extract::cookie::CookieJar;
use portal_core::models::api::{LoginRequest, LoginResponse, LogoutResponse, ValidateTokenResponse};
use tracing::debug;

use crate::AppState;
use crate::error::AppResult;
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthenticatedUser;
use crate::services::auth;
use crate::services::cookies::{SESSION_COOKIE, clear_session_cookie, session_cookie};

/// `POST /api/login`: authenticate with email + password, set the session cookie.
pub async fn login_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(body): ValidatedJson<LoginRequest>,
) -> AppResult<(CookieJar, Json<LoginResponse>)> {
    let session = auth::login(state.store.as_ref(), &state.config, &body).await?;
    let cookie = session_cookie(&session.token, session.max_age, state.config.cookie_secure);
    Ok((jar.add(cookie), Json(session.response)))
}

/// `POST /api/logout`: clear the session cookie. Works with or without one.
///
/// The token itself stays valid until it expires; only this client forgets it.
pub async fn logout_handler(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<LogoutResponse>) {
    if jar.get(SESSION_COOKIE).is_some() {
        debug!("clearing session cookie");
    }
    let jar = jar.add(clear_session_cookie(state.config.cookie_secure));
    (jar, Json(LogoutResponse { success: true }))
}

/// `GET /api/validate-token`: report the identity behind a valid token.
pub async fn validate_token_handler(
    AuthenticatedUser(identity): AuthenticatedUser,
) -> Json<ValidateTokenResponse> {
    Json(ValidateTokenResponse {
        valid: true,
        user: identity,
    })
}
