//! Authentication service: login, session issuance and profile lookup.

use chrono::Duration;
use portal_core::auth::jwt::{SessionTier, issue_session_token};
use portal_core::auth::store::{UserStore, authenticate};
use portal_core::models::api::{DashboardResponse, LoginRequest, LoginResponse};
use portal_core::models::auth::{Identity, User};
use tracing::info;

use crate::config::ApiConfig;
use crate::error::{AppError, AppResult};
use crate::routes::LOGIN_REDIRECT;

/// A freshly minted session: the response body plus what goes in the cookie.
#[derive(Debug)]
pub struct IssuedSession {
    pub response: LoginResponse,
    pub token: String,
    pub max_age: Duration,
}

/// Authenticate with email + password and mint a session token.
pub async fn login(
    store: &dyn UserStore,
    config: &ApiConfig,
    request: &LoginRequest,
) -> AppResult<IssuedSession> {
    let user = authenticate(store, &request.email, &request.password).await?;

    let tier = SessionTier::from_remember(request.remember);
    let max_age = config.session.ttl(tier);
    let token = issue_session_token(
        &Identity::from(&user),
        max_age,
        config.jwt_secret.as_bytes(),
    )?;

    info!(user_id = user.id, ?tier, "session issued");

    Ok(IssuedSession {
        response: LoginResponse {
            success: true,
            user,
            redirect: LOGIN_REDIRECT.to_string(),
        },
        token,
        max_age,
    })
}

/// Full profile of the session user.
///
/// A valid token can outlive its user record, which is reported as 404.
pub async fn current_user(store: &dyn UserStore, identity: &Identity) -> AppResult<User> {
    store
        .find_by_id(identity.id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".into()))
}

/// Dashboard greeting for the session user.
pub fn dashboard(identity: &Identity) -> DashboardResponse {
    DashboardResponse {
        message: format!("Welcome back, {}", identity.email),
        user: identity.clone(),
    }
}
