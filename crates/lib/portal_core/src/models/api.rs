//! Request and response bodies of the HTTP API.
//!
//! Shared by the server (`portal_api`) and the client router
//! (`portal_router`) so both ends agree on the wire format.

use serde::{Deserialize, Serialize};

use super::auth::{Identity, User};

/// `POST /api/login` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Selects the extended session lifetime.
    #[serde(default)]
    pub remember: bool,
}

/// `POST /api/login` success body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub user: User,
    /// Where the client should go next.
    pub redirect: String,
}

/// `POST /api/logout` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub success: bool,
}

/// `GET /api/validate-token` success body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateTokenResponse {
    pub valid: bool,
    pub user: Identity,
}

/// `GET /api/dashboard` success body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub message: String,
    pub user: Identity,
}

/// `GET /api/health` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub name: String,
    pub version: String,
}

/// Body of every non-2xx API response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    /// Human-readable message.
    pub error: String,
    /// Stable machine-readable kind, e.g. `unauthorized`.
    pub code: String,
}

/// Paths of the HTTP API.
pub mod paths {
    /// POST: exchange credentials for a session cookie.
    pub const LOGIN: &str = "/api/login";
    /// POST: clear the session cookie.
    pub const LOGOUT: &str = "/api/logout";
    /// GET: check the presented session token.
    pub const VALIDATE_TOKEN: &str = "/api/validate-token";
    /// GET: profile of the session user.
    pub const USER: &str = "/api/user";
    /// GET: dashboard greeting for the session user.
    pub const DASHBOARD: &str = "/api/dashboard";
    /// GET: service name and version.
    pub const HEALTH: &str = "/api/health";
}
