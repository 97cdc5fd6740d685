//! # portal_api
//!
//! HTTP API library for Portal: login/logout, session validation, the
//! session-user endpoints and the static single-page frontend.

pub mod assets;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use axum::error_handling::HandleErrorLayer;
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get, post};
use axum::{BoxError, Router};
use portal_core::auth::store::UserStore;
use tower::ServiceBuilder;
use tower::timeout::TimeoutLayer;
use tower::timeout::error::Elapsed;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::error::AppError;
use crate::handlers::{api_not_found, auth, health, user};

/// Upper bound on handling a single request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Credential store, read-only on the request path.
    pub store: Arc<dyn UserStore>,
    /// API configuration.
    pub config: ApiConfig,
}

/// Turn a handler panic into the generic 500 body.
fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    AppError::Internal(format!("handler panicked: {detail}")).into_response()
}

/// Turn a request that ran past its deadline into a 408 with the usual body.
async fn handle_timeout(err: BoxError) -> AppError {
    if err.is::<Elapsed>() {
        AppError::Timeout
    } else {
        AppError::Internal(format!("middleware error: {err}"))
    }
}

/// Builds the Axum router with all routes, shared state and middleware.
pub fn router(state: AppState) -> Router {
    apply_layers(app_routes(state), REQUEST_TIMEOUT)
}

/// Routes and static assets without the outer middleware stack.
pub fn app_routes(state: AppState) -> Router {
    // Public routes (no auth required)
    let public = Router::new()
        .route(routes::GET_API_HEALTH, get(health::health))
        .route(routes::POST_API_LOGIN, post(auth::login_handler))
        .route(routes::POST_API_LOGOUT, post(auth::logout_handler))
        .route(routes::ANY_API_FALLBACK, any(api_not_found));

    // Protected routes (require a session)
    let protected = Router::new()
        .route(
            routes::GET_API_VALIDATE_TOKEN,
            get(auth::validate_token_handler),
        )
        .route(routes::GET_API_USER, get(user::current_user_handler))
        .route(routes::GET_API_DASHBOARD, get(user::dashboard_handler))
        .merge(assets::protected_pages(&state.config.static_dir))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .fallback_service(assets::static_files(&state.config.static_dir))
        .with_state(state)
}

/// Panic recovery, request deadline and tracing around `router`.
pub fn apply_layers(router: Router, request_timeout: Duration) -> Router {
    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_timeout))
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .layer(TraceLayer::new_for_http())
}
