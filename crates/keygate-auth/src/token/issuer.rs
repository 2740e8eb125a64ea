//! Signed token creation.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};

use keygate_core::config::auth::AuthConfig;
use keygate_core::error::AppError;

use super::TOKEN_TTL_SECS;
use super::claims::Claims;

/// Creates signed HS256 bearer tokens.
///
/// The signing secret is passed in explicitly at construction; there is
/// no ambient configuration lookup, and the key never changes for the
/// lifetime of the issuer.
#[derive(Clone)]
pub struct TokenIssuer {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer").finish()
    }
}

impl TokenIssuer {
    /// Creates a new issuer from auth configuration.
    ///
    /// Fails if the configured secret is missing or too weak. This is a
    /// startup-time configuration error, never a per-request one.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        config.validate()?;
        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        })
    }

    /// Issues a token for the given subject and roles using the current
    /// clock.
    pub fn issue(
        &self,
        subject: &str,
        roles: &BTreeSet<String>,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        self.issue_at(subject, roles, Utc::now())
    }

    /// Issues a token as of the given instant.
    ///
    /// Deterministic for identical inputs and timestamp; the expiry is
    /// fixed at one hour past `now`. Exposed separately so callers and
    /// tests can pin the clock.
    pub fn issue_at(
        &self,
        subject: &str,
        roles: &BTreeSet<String>,
        now: DateTime<Utc>,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        let expires_at = now + Duration::seconds(TOKEN_TTL_SECS);

        let claims = Claims {
            sub: subject.to_string(),
            roles: roles.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))?;

        Ok((token, expires_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "an-integration-test-secret-of-32b!".to_string(),
            password_min_length: 8,
            password_special_chars: "!@#$%".to_string(),
        }
    }

    #[test]
    fn test_weak_secret_rejected_at_construction() {
        let config = AuthConfig {
            jwt_secret: "short".to_string(),
            ..make_config()
        };
        assert!(TokenIssuer::new(&config).is_err());
    }

    #[test]
    fn test_token_shape_and_expiry() {
        let issuer = TokenIssuer::new(&make_config()).unwrap();
        let now = Utc::now();

        let roles = ["operator".to_string()].into_iter().collect();
        let (token, expires_at) = issuer.issue_at("alice", &roles, now).unwrap();

        assert_eq!(token.split('.').count(), 3);
        assert_eq!(expires_at.timestamp(), now.timestamp() + TOKEN_TTL_SECS);
    }

    #[test]
    fn test_issue_is_deterministic_for_fixed_clock() {
        let issuer = TokenIssuer::new(&make_config()).unwrap();
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let roles = BTreeSet::new();

        let (first, _) = issuer.issue_at("alice", &roles, now).unwrap();
        let (second, _) = issuer.issue_at("alice", &roles, now).unwrap();
        assert_eq!(first, second);
    }
}
