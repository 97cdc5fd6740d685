//! Router errors.

use thiserror::Error;

/// Failures while loading or applying a navigation.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected status {status} for {path}")]
    Status { path: String, status: u16 },

    #[error("malformed fragment: {0}")]
    MalformedFragment(String),

    #[error("no route for {0}")]
    UnknownRoute(String),

    /// A newer navigation started; this one was abandoned.
    #[error("navigation superseded")]
    Superseded,

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

impl From<reqwest::Error> for RouterError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RouterError::Timeout
        } else {
            RouterError::Transport(e.to_string())
        }
    }
}
