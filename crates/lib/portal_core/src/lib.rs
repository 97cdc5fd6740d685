//! # portal_core
//!
//! Core domain logic for Portal: users, session tokens, password hashing and
//! the credential store abstraction shared by the API server and the client
//! router.

pub mod auth;
pub mod models;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
