//! Credential store: user lookup by email or id.
//!
//! The API only sees the [`UserStore`] trait. [`MemoryUserStore`] is the
//! bundled implementation, seeded from a JSON file of users whose passwords
//! are already bcrypt-hashed.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use super::AuthError;
use super::password::{verify_dummy, verify_password};
use crate::models::auth::{User, UserWithPassword};

/// Read-only lookup of user records.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fetch a user by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> Result<Option<UserWithPassword>, AuthError>;

    /// Fetch a user by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AuthError>;
}

/// Check email + password against a store.
///
/// Unknown email and wrong password both yield [`AuthError::CredentialError`],
/// and both cost one bcrypt verification.
pub async fn authenticate(
    store: &dyn UserStore,
    email: &str,
    password: &str,
) -> Result<User, AuthError> {
    let Some(record) = store.find_by_email(email).await? else {
        verify_dummy(password);
        debug!("login rejected: no matching user");
        return Err(AuthError::CredentialError);
    };

    match verify_password(password, &record.password_hash) {
        Ok(true) => Ok(record.user),
        Ok(false) => {
            debug!(user_id = record.user.id, "login rejected: password mismatch");
            Err(AuthError::CredentialError)
        }
        // A corrupt stored hash must not reveal that the email exists.
        Err(e) => {
            tracing::warn!(user_id = record.user.id, "stored password hash unusable: {e}");
            Err(AuthError::CredentialError)
        }
    }
}

/// One entry of the JSON seed file.
#[derive(Debug, Deserialize)]
struct SeedUser {
    id: i64,
    email: String,
    name: String,
    password_hash: String,
}

/// In-memory store, keyed by normalized email and by id.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    by_email: HashMap<String, UserWithPassword>,
    email_by_id: HashMap<i64, String>,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl MemoryUserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user. Ids and emails must be unique.
    pub fn insert(&mut self, user: User, password_hash: String) -> Result<(), AuthError> {
        let key = normalize_email(&user.email);
        if self.by_email.contains_key(&key) {
            return Err(AuthError::ValidationError(format!(
                "duplicate email: {}",
                user.email
            )));
        }
        if self.email_by_id.contains_key(&user.id) {
            return Err(AuthError::ValidationError(format!(
                "duplicate user id: {}",
                user.id
            )));
        }
        self.email_by_id.insert(user.id, key.clone());
        self.by_email.insert(
            key,
            UserWithPassword {
                user,
                password_hash,
            },
        );
        Ok(())
    }

    /// Number of users in the store.
    pub fn len(&self) -> usize {
        self.by_email.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_email.is_empty()
    }

    /// Build a store from seed JSON: `[{"id", "email", "name", "password_hash"}]`.
    pub fn from_json(json: &str) -> Result<Self, AuthError> {
        let seeds: Vec<SeedUser> = serde_json::from_str(json)
            .map_err(|e| AuthError::ValidationError(format!("users file: {e}")))?;

        let mut store = Self::new();
        for seed in seeds {
            store.insert(
                User {
                    id: seed.id,
                    email: seed.email,
                    name: seed.name,
                },
                seed.password_hash,
            )?;
        }
        Ok(store)
    }

    /// Load a seed file from disk.
    pub async fn load(path: &Path) -> Result<Self, AuthError> {
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AuthError::Internal(format!("read {}: {e}", path.display())))?;
        let store = Self::from_json(&json)?;
        info!(path = %path.display(), users = store.len(), "loaded users");
        Ok(store)
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserWithPassword>, AuthError> {
        Ok(self.by_email.get(&normalize_email(email)).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AuthError> {
        Ok(self
            .email_by_id
            .get(&id)
            .and_then(|email| self.by_email.get(email))
            .map(|record| record.user.clone()))
    }
}
