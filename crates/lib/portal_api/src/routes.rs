//! Route path constants.

pub use portal_core::models::api::paths::{
    DASHBOARD as GET_API_DASHBOARD, HEALTH as GET_API_HEALTH, LOGIN as POST_API_LOGIN,
    LOGOUT as POST_API_LOGOUT, USER as GET_API_USER, VALIDATE_TOKEN as GET_API_VALIDATE_TOKEN,
};

/// Catch-all under `/api` so unknown API paths get a JSON 404 instead of the
/// application shell.
pub const ANY_API_FALLBACK: &str = "/api/{*rest}";

/// Page fragments that are only served to an authenticated session.
pub const PROTECTED_PAGES: [&str; 3] = [
    "/pages/dashboard.html",
    "/pages/profile.html",
    "/pages/history.html",
];

/// Where the client goes after a successful login.
pub const LOGIN_REDIRECT: &str = "/dashboard";
