//! Session token issuance and verification (HS256 JWT).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::distr::Alphanumeric;
use rand::{Rng, rng};

use super::AuthError;
use crate::models::auth::{Identity, TokenClaims};

/// Default session lifetime: 1 hour.
pub const DEFAULT_SESSION_SECS: i64 = 60 * 60;

/// "Remember me" session lifetime: 7 days.
pub const REMEMBER_SESSION_SECS: i64 = 7 * 24 * 60 * 60;

/// Which lifetime a freshly issued session gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTier {
    Default,
    Extended,
}

impl SessionTier {
    /// Map the client's "remember me" flag to a tier.
    pub fn from_remember(remember: bool) -> Self {
        if remember {
            SessionTier::Extended
        } else {
            SessionTier::Default
        }
    }
}

/// Lifetimes for both session tiers.
///
/// The same policy drives token expiry and cookie max-age, so the two can
/// never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPolicy {
    pub default_ttl: Duration,
    pub remember_ttl: Duration,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            default_ttl: Duration::seconds(DEFAULT_SESSION_SECS),
            remember_ttl: Duration::seconds(REMEMBER_SESSION_SECS),
        }
    }
}

impl SessionPolicy {
    pub fn ttl(&self, tier: SessionTier) -> Duration {
        match tier {
            SessionTier::Default => self.default_ttl,
            SessionTier::Extended => self.remember_ttl,
        }
    }
}

/// Generate a signed session token for an already-authenticated identity.
pub fn issue_session_token(
    identity: &Identity,
    ttl: Duration,
    secret: &[u8],
) -> Result<String, AuthError> {
    issue_session_token_at(identity, ttl, secret, Utc::now())
}

/// Like [`issue_session_token`], with an explicit issue instant.
pub fn issue_session_token_at(
    identity: &Identity,
    ttl: Duration,
    secret: &[u8],
    now: DateTime<Utc>,
) -> Result<String, AuthError> {
    let claims = TokenClaims {
        id: identity.id,
        email: identity.email.clone(),
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| AuthError::Internal(format!("jwt encode: {e}")))
}

/// Verify a session token against the current time.
pub fn verify_session_token(token: &str, secret: &[u8]) -> Result<TokenClaims, AuthError> {
    verify_session_token_at(token, secret, Utc::now())
}

/// Verify signature and expiry of a session token at instant `now`.
///
/// A token is valid for `iat <= now < exp`; no leeway is applied.
pub fn verify_session_token_at(
    token: &str,
    secret: &[u8],
    now: DateTime<Utc>,
) -> Result<TokenClaims, AuthError> {
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }

    let key = DecodingKey::from_secret(secret);
    let mut validation = Validation::default();
    // Expiry is checked below against `now` rather than the wall clock.
    validation.validate_exp = false;
    validation.leeway = 0;

    let claims = decode::<TokenClaims>(token, &key, &validation)
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?
        .claims;

    if claims.iat > now.timestamp() {
        return Err(AuthError::InvalidToken("issued in the future".into()));
    }
    if claims.exp <= now.timestamp() {
        return Err(AuthError::ExpiredToken);
    }
    Ok(claims)
}

/// Generate a random alphanumeric signing secret.
pub fn generate_secret(len: usize) -> String {
    rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"unit-test-secret";

    fn identity() -> Identity {
        Identity {
            id: 7,
            email: "a@b.com".into(),
        }
    }

    #[test]
    fn issued_token_round_trips_identity() {
        let token = issue_session_token(&identity(), Duration::hours(1), SECRET).unwrap();
        let claims = verify_session_token(&token, SECRET).unwrap();
        assert_eq!(claims.identity(), identity());

        let json = serde_json::to_value(claims.identity()).unwrap();
        assert_eq!(json, serde_json::json!({"id": 7, "email": "a@b.com"}));
    }

    #[test]
    fn default_tier_expires_before_extended_tier() {
        let policy = SessionPolicy::default();
        let issued = Utc::now();
        let aged = issued + Duration::seconds(3601);

        let short = issue_session_token_at(
            &identity(),
            policy.ttl(SessionTier::Default),
            SECRET,
            issued,
        )
        .unwrap();
        let long = issue_session_token_at(
            &identity(),
            policy.ttl(SessionTier::Extended),
            SECRET,
            issued,
        )
        .unwrap();

        assert!(matches!(
            verify_session_token_at(&short, SECRET, aged),
            Err(AuthError::ExpiredToken)
        ));
        assert!(verify_session_token_at(&long, SECRET, aged).is_ok());
    }

    #[test]
    fn token_is_valid_until_its_expiry_instant() {
        let issued = Utc::now();
        let token = issue_session_token_at(&identity(), Duration::seconds(60), SECRET, issued)
            .unwrap();

        assert!(verify_session_token_at(&token, SECRET, issued + Duration::seconds(59)).is_ok());
        assert!(matches!(
            verify_session_token_at(&token, SECRET, issued + Duration::seconds(60)),
            Err(AuthError::ExpiredToken)
        ));
    }

    #[test]
    fn token_from_the_future_is_invalid() {
        let issued = Utc::now();
        let token = issue_session_token_at(&identity(), Duration::hours(1), SECRET, issued)
            .unwrap();

        assert!(verify_session_token_at(&token, SECRET, issued).is_ok());
        let err = verify_session_token_at(&token, SECRET, issued - Duration::seconds(1))
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn wrong_secret_is_invalid_not_expired() {
        let token = issue_session_token(&identity(), Duration::hours(1), SECRET).unwrap();
        let err = verify_session_token(&token, b"another-secret").unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
        assert!(err.is_invalid_token());
    }

    #[test]
    fn garbage_token_is_invalid() {
        let err = verify_session_token("not.a.jwt", SECRET).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn empty_token_is_missing() {
        assert!(matches!(
            verify_session_token("", SECRET),
            Err(AuthError::MissingToken)
        ));
    }

    #[test]
    fn tier_follows_remember_flag() {
        assert_eq!(SessionTier::from_remember(false), SessionTier::Default);
        assert_eq!(SessionTier::from_remember(true), SessionTier::Extended);
        let policy = SessionPolicy::default();
        assert_eq!(policy.ttl(SessionTier::Default).num_seconds(), 3600);
        assert_eq!(policy.ttl(SessionTier::Extended).num_seconds(), 604_800);
    }

    #[test]
    fn generated_secret_has_requested_length() {
        let secret = generate_secret(64);
        assert_eq!(secret.len(), 64);
        assert!(secret.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
