//! Session-user endpoints.

use axum::Json;
use axum::extract::State;
use portal_core::models::api::DashboardResponse;
use portal_core::models::auth::User;

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::services::auth;

/// `GET /api/user`: profile of the session user.
pub async fn current_user_handler(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
) -> AppResult<Json<User>> {
    let user = auth::current_user(state.store.as_ref(), &identity).await?;
    Ok(Json(user))
}

/// `GET /api/dashboard`
pub async fn dashboard_handler(
    AuthenticatedUser(identity): AuthenticatedUser,
) -> Json<DashboardResponse> {
    Json(auth::dashboard(&identity))
}
