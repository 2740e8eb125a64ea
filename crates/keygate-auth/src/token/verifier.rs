//! Signed token validation.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use thiserror::Error;

use keygate_core::config::auth::AuthConfig;
use keygate_core::error::AppError;

use super::claims::Claims;

/// Why a token failed verification.
///
/// Callers treat every variant as "unauthenticated" toward end users;
/// the variants exist so telemetry can tell tampering, expiry, and
/// garbage apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VerifyError {
    /// The token is not three well-formed base64url segments carrying
    /// the expected claims.
    #[error("token is structurally malformed")]
    Malformed,
    /// The signature does not match the configured secret.
    #[error("token signature is invalid")]
    SignatureInvalid,
    /// The token declares a signing algorithm other than the configured
    /// one. Rejected outright to prevent downgrade/confusion attacks.
    #[error("token declares an unexpected signing algorithm")]
    AlgorithmMismatch,
    /// The signature is valid but the token has expired.
    #[error("token has expired")]
    Expired,
}

impl From<VerifyError> for AppError {
    fn from(err: VerifyError) -> Self {
        AppError::authentication(err.to_string())
    }
}

/// Validates HS256 bearer tokens and recovers their claims.
#[derive(Clone)]
pub struct TokenVerifier {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration, pinned to HS256.
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenVerifier {
    /// Creates a new verifier from auth configuration.
    ///
    /// Fails if the configured secret is missing or too weak, the same
    /// startup-time check the issuer performs.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        config.validate()?;

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against an explicit clock in `verify_at` so
        // the invariant `valid iff now < exp` is testable at any instant.
        validation.validate_exp = false;

        Ok(Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        })
    }

    /// Verifies a token against the current clock.
    pub fn verify(&self, token: &str) -> Result<Claims, VerifyError> {
        self.verify_at(token, Utc::now())
    }

    /// Verifies a token as of the given instant.
    ///
    /// The signature is checked first; expiry only ever reported for a
    /// token whose signature is known good.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, VerifyError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidSignature => VerifyError::SignatureInvalid,
                jsonwebtoken::errors::ErrorKind::InvalidAlgorithm => VerifyError::AlgorithmMismatch,
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => VerifyError::Expired,
                _ => VerifyError::Malformed,
            })?;

        let claims = token_data.claims;
        if claims.is_expired_at(now) {
            return Err(VerifyError::Expired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use chrono::Duration;
    use jsonwebtoken::{EncodingKey, Header, encode};

    use crate::token::TOKEN_TTL_SECS;
    use crate::token::issuer::TokenIssuer;

    use super::*;

    const SECRET: &str = "an-integration-test-secret-of-32b!";

    fn make_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: SECRET.to_string(),
            password_min_length: 8,
            password_special_chars: "!@#$%".to_string(),
        }
    }

    fn make_pair() -> (TokenIssuer, TokenVerifier) {
        let config = make_config();
        (
            TokenIssuer::new(&config).unwrap(),
            TokenVerifier::new(&config).unwrap(),
        )
    }

    fn roles(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|r| r.to_string()).collect()
    }

    #[test]
    fn test_roundtrip_recovers_claims() {
        let (issuer, verifier) = make_pair();
        let now = Utc::now();
        let roles = roles(&["auditor", "operator"]);

        let (token, _) = issuer.issue_at("alice", &roles, now).unwrap();
        let claims = verifier.verify_at(&token, now).unwrap();

        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.roles, roles);
        assert_eq!(claims.iat, now.timestamp());
        assert_eq!(claims.exp, now.timestamp() + TOKEN_TTL_SECS);
    }

    #[test]
    fn test_expired_token_rejected() {
        let (issuer, verifier) = make_pair();
        let issued_at = Utc::now();
        let (token, _) = issuer.issue_at("alice", &BTreeSet::new(), issued_at).unwrap();

        // Valid up to the last second of its lifetime.
        let almost = issued_at + Duration::seconds(TOKEN_TTL_SECS - 1);
        assert!(verifier.verify_at(&token, almost).is_ok());

        let after = issued_at + Duration::seconds(TOKEN_TTL_SECS + 1);
        assert_eq!(
            verifier.verify_at(&token, after).unwrap_err(),
            VerifyError::Expired
        );
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let (issuer, verifier) = make_pair();
        let now = Utc::now();
        let (token, _) = issuer.issue_at("alice", &BTreeSet::new(), now).unwrap();

        let mut parts: Vec<&str> = token.split('.').collect();
        let mut payload = URL_SAFE_NO_PAD.decode(parts[1]).unwrap();
        // Flip one bit of the payload; the signature no longer matches.
        payload[10] ^= 0x01;
        let tampered_payload = URL_SAFE_NO_PAD.encode(&payload);
        parts[1] = &tampered_payload;
        let tampered = parts.join(".");

        assert_eq!(
            verifier.verify_at(&tampered, now).unwrap_err(),
            VerifyError::SignatureInvalid
        );
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let (issuer, _) = make_pair();
        let other = AuthConfig {
            jwt_secret: "a-completely-different-secret-32b!".to_string(),
            ..make_config()
        };
        let verifier = TokenVerifier::new(&other).unwrap();

        let now = Utc::now();
        let (token, _) = issuer.issue_at("alice", &BTreeSet::new(), now).unwrap();

        assert_eq!(
            verifier.verify_at(&token, now).unwrap_err(),
            VerifyError::SignatureInvalid
        );
    }

    #[test]
    fn test_algorithm_mismatch_rejected() {
        let (_, verifier) = make_pair();
        let now = Utc::now();

        let claims = Claims {
            sub: "alice".to_string(),
            roles: BTreeSet::new(),
            iat: now.timestamp(),
            exp: now.timestamp() + TOKEN_TTL_SECS,
        };
        let token = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_eq!(
            verifier.verify_at(&token, now).unwrap_err(),
            VerifyError::AlgorithmMismatch
        );
    }

    #[test]
    fn test_garbage_rejected_as_malformed() {
        let (_, verifier) = make_pair();
        let now = Utc::now();

        assert_eq!(
            verifier.verify_at("", now).unwrap_err(),
            VerifyError::Malformed
        );
        assert_eq!(
            verifier.verify_at("not-a-token", now).unwrap_err(),
            VerifyError::Malformed
        );
        assert_eq!(
            verifier.verify_at("a.b.c.d", now).unwrap_err(),
            VerifyError::Malformed
        );
    }
}
