//! API server configuration.

use std::path::PathBuf;

use chrono::Duration;
use portal_core::auth::jwt::SessionPolicy;
use thiserror::Error;

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default static root: `public/` (shell, public pages, components) and
/// `protected/` (gated pages).
pub const DEFAULT_STATIC_DIR: &str = "frontend";

/// Configuration errors. Any of these aborts startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET is not set; refusing to start without a signing secret")]
    MissingSecret,

    #[error("invalid {var}: {message}")]
    Invalid { var: &'static str, message: String },
}

/// Configuration for the API server.
#[derive(Clone)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "0.0.0.0:3000").
    pub bind_addr: String,
    /// JWT signing secret.
    pub jwt_secret: String,
    /// Session lifetimes for both tiers.
    pub session: SessionPolicy,
    /// Whether the session cookie carries the `Secure` attribute.
    pub cookie_secure: bool,
    /// Root of the static frontend (`public/` and `protected/`).
    pub static_dir: PathBuf,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("bind_addr", &self.bind_addr)
            .field("jwt_secret", &"<redacted>")
            .field("session", &self.session)
            .field("cookie_secure", &self.cookie_secure)
            .field("static_dir", &self.static_dir)
            .finish()
    }
}

impl ApiConfig {
    /// Config with defaults for everything but the secret.
    pub fn new(jwt_secret: impl Into<String>) -> Result<Self, ConfigError> {
        let jwt_secret = jwt_secret.into();
        if jwt_secret.trim().is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        Ok(Self {
            bind_addr: format!("0.0.0.0:{DEFAULT_PORT}"),
            jwt_secret,
            session: SessionPolicy::default(),
            cookie_secure: false,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        })
    }

    /// Reads configuration from environment variables.
    ///
    /// | Variable         | Default                         |
    /// |------------------|---------------------------------|
    /// | `PORT`           | `3000`                          |
    /// | `JWT_SECRET`     | none, startup fails             |
    /// | `JWT_EXPIRES_IN` | `1h` (`<n>`, `<n>s/m/h/d`)      |
    /// | `NODE_ENV`       | `development`; `production` sets `Secure` |
    /// | `STATIC_DIR`     | `frontend`                      |
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = std::env::var("JWT_SECRET").map_err(|_| ConfigError::MissingSecret)?;
        let mut config = Self::new(secret)?;

        if let Ok(port) = std::env::var("PORT") {
            let port: u16 = port.trim().parse().map_err(|e| ConfigError::Invalid {
                var: "PORT",
                message: format!("{e}"),
            })?;
            config.bind_addr = format!("0.0.0.0:{port}");
        }

        if let Ok(expires_in) = std::env::var("JWT_EXPIRES_IN") {
            config.session.default_ttl =
                parse_duration(&expires_in).map_err(|message| ConfigError::Invalid {
                    var: "JWT_EXPIRES_IN",
                    message,
                })?;
        }

        config.cookie_secure = std::env::var("NODE_ENV")
            .map(|env| env.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        if let Ok(dir) = std::env::var("STATIC_DIR")
            && !dir.is_empty()
        {
            config.static_dir = PathBuf::from(dir);
        }

        Ok(config)
    }

    /// Use `port` on all interfaces.
    pub fn with_port(mut self, port: u16) -> Self {
        self.bind_addr = format!("0.0.0.0:{port}");
        self
    }
}

/// Parse `"3600"`, `"90s"`, `"15m"`, `"1h"` or `"7d"` into a positive duration.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    let split = input
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(input.len());
    let (digits, unit) = input.split_at(split);

    let value: i64 = digits
        .parse()
        .map_err(|_| format!("expected a number with optional unit, got {input:?}"))?;
    if value <= 0 {
        return Err(format!("duration must be positive, got {input:?}"));
    }

    let duration = match unit {
        "" | "s" => Duration::try_seconds(value),
        "m" => Duration::try_minutes(value),
        "h" => Duration::try_hours(value),
        "d" => Duration::try_days(value),
        other => return Err(format!("unknown duration unit {other:?}")),
    };
    duration.ok_or_else(|| format!("duration out of range: {input:?}"))
}
