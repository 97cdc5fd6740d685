//! Server access for the router.
//!
//! [`Backend`] covers everything the navigator asks of the server: fragments,
//! session checks, login, logout and the profile. [`HttpBackend`] talks to a
//! running `portal_server` and keeps the session cookie in its own jar.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use portal_core::models::api::{
    ErrorResponse, LoginRequest, LoginResponse, ValidateTokenResponse, paths,
};
use portal_core::models::auth::{Identity, User};
use reqwest::StatusCode;
use url::Url;

use crate::error::RouterError;

/// Message shown when a failed login carries no usable error body.
pub const LOGIN_FAILED: &str = "Login failed";

/// Result of asking the server whether the current session is good.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCheck {
    Valid(Identity),
    /// No token was presented.
    Missing,
    /// A token was presented but rejected.
    Invalid,
}

impl SessionCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, SessionCheck::Valid(_))
    }
}

/// Result of a login attempt that reached the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Accepted { user: User, redirect: String },
    Rejected { message: String },
}

#[async_trait]
pub trait Backend: Send + Sync {
    /// Raw markup of the fragment at `path`.
    async fn fetch_fragment(&self, path: &str) -> Result<String, RouterError>;

    async fn validate_session(&self) -> Result<SessionCheck, RouterError>;

    async fn login(&self, request: &LoginRequest) -> Result<LoginOutcome, RouterError>;

    async fn logout(&self) -> Result<(), RouterError>;

    async fn current_user(&self) -> Result<User, RouterError>;
}

/// [`Backend`] over HTTP with a cookie jar.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base: Url,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RouterError> {
        let base = Url::parse(base_url)?;
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url(&self, path: &str) -> Result<Url, RouterError> {
        Ok(self.base.join(path)?)
    }
}

fn status_error(path: &str, status: StatusCode) -> RouterError {
    RouterError::Status {
        path: path.to_string(),
        status: status.as_u16(),
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn fetch_fragment(&self, path: &str) -> Result<String, RouterError> {
        let response = self.client.get(self.url(path)?).send().await?;
        let status = response.status();
        debug!("GET {path} -> {status}");
        if !status.is_success() {
            return Err(status_error(path, status));
        }
        Ok(response.text().await?)
    }

    async fn validate_session(&self) -> Result<SessionCheck, RouterError> {
        let response = self
            .client
            .get(self.url(paths::VALIDATE_TOKEN)?)
            .send()
            .await?;
        match response.status() {
            StatusCode::OK => {
                let body: ValidateTokenResponse = response.json().await?;
                Ok(SessionCheck::Valid(body.user))
            }
            StatusCode::UNAUTHORIZED => Ok(SessionCheck::Missing),
            status => {
                debug!("session rejected with {status}");
                Ok(SessionCheck::Invalid)
            }
        }
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginOutcome, RouterError> {
        let response = self
            .client
            .post(self.url(paths::LOGIN)?)
            .json(request)
            .send()
            .await?;
        if response.status().is_success() {
            let body: LoginResponse = response.json().await?;
            return Ok(LoginOutcome::Accepted {
                user: body.user,
                redirect: body.redirect,
            });
        }
        let message = response
            .json::<ErrorResponse>()
            .await
            .map(|body| body.error)
            .unwrap_or_else(|_| LOGIN_FAILED.to_string());
        Ok(LoginOutcome::Rejected { message })
    }

    async fn logout(&self) -> Result<(), RouterError> {
        let response = self.client.post(self.url(paths::LOGOUT)?).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error(paths::LOGOUT, status));
        }
        Ok(())
    }

    async fn current_user(&self) -> Result<User, RouterError> {
        let response = self.client.get(self.url(paths::USER)?).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error(paths::USER, status));
        }
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unparseable_base() {
        let err = HttpBackend::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, RouterError::Url(_)));
    }

    #[test]
    fn joins_paths_onto_base() {
        let backend = HttpBackend::new("http://127.0.0.1:3000", Duration::from_secs(1)).unwrap();
        assert_eq!(
            backend.url("/pages/home.html").unwrap().as_str(),
            "http://127.0.0.1:3000/pages/home.html"
        );
        assert_eq!(
            backend.url(paths::VALIDATE_TOKEN).unwrap().as_str(),
            "http://127.0.0.1:3000/api/validate-token"
        );
    }
}
