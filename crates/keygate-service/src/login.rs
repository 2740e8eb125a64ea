//! Login flow — verify credentials and issue a bearer token.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};

use keygate_auth::password::PasswordHasher;
use keygate_auth::token::{Claims, TokenIssuer, TokenVerifier};
use keygate_core::error::{AppError, ErrorKind};
use keygate_database::store::CredentialStore;

/// Input for the login flow.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct LoginRequest {
    /// Username to authenticate.
    pub username: String,
    /// Candidate password.
    pub password: String,
}

/// A freshly issued bearer token.
#[derive(Debug, Clone, serde::Serialize)]
pub struct IssuedToken {
    /// The compact signed token string.
    pub token: String,
    /// When the token expires.
    pub expires_at: DateTime<Utc>,
}

/// Why a login or token check failed.
#[derive(Debug, Error)]
pub enum LoginError {
    /// Credentials did not authenticate. Deliberately opaque: an unknown
    /// username and a wrong password produce this same value, with
    /// uniform timing, so callers cannot enumerate accounts.
    #[error("invalid username or password")]
    InvalidCredentials,
    /// The credential store failed; retryable per its error kind.
    #[error(transparent)]
    Store(#[from] AppError),
}

/// Orchestrates the login flow and exposes token verification to the
/// request-handling collaborator.
#[derive(Clone)]
pub struct LoginService {
    /// Credential store.
    store: Arc<dyn CredentialStore>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
    /// Token issuer.
    issuer: Arc<TokenIssuer>,
    /// Token verifier.
    verifier: Arc<TokenVerifier>,
    /// Hash verified against when the username is unknown, so the
    /// absent-user path costs the same as a wrong-password path.
    decoy_hash: String,
}

impl std::fmt::Debug for LoginService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginService").finish()
    }
}

impl LoginService {
    /// Creates a new login service.
    ///
    /// Computes the decoy hash once up front; this is the only place the
    /// flow pays hashing cost outside a request.
    pub fn new(
        store: Arc<dyn CredentialStore>,
        hasher: Arc<PasswordHasher>,
        issuer: Arc<TokenIssuer>,
        verifier: Arc<TokenVerifier>,
    ) -> Result<Self, AppError> {
        let decoy_hash = hasher.hash_password("keygate-decoy-credential")?;
        Ok(Self {
            store,
            hasher,
            issuer,
            verifier,
            decoy_hash,
        })
    }

    /// Runs the login flow.
    ///
    /// A password verification is performed whether or not the username
    /// exists, and both failure modes collapse into the same
    /// [`LoginError::InvalidCredentials`]. Store failures propagate
    /// separately — an outage must never read as a credential failure.
    pub async fn login(&self, req: LoginRequest) -> Result<IssuedToken, LoginError> {
        let user = self.store.find_by_username(&req.username).await?;

        let stored_hash = match &user {
            Some(user) => user.password_hash.clone(),
            None => self.decoy_hash.clone(),
        };

        // Verification is CPU-bound; keep it off the async workers.
        let hasher = self.hasher.clone();
        let password = req.password;
        let matched =
            tokio::task::spawn_blocking(move || hasher.verify_password(&password, &stored_hash))
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Internal, "Verification task panicked", e)
                })?;

        let Some(user) = user else {
            debug!("Login failed: unknown username");
            return Err(LoginError::InvalidCredentials);
        };

        if !matched {
            warn!(user_id = %user.id, "Login failed: password mismatch");
            return Err(LoginError::InvalidCredentials);
        }

        // Roles are read at issuance time, so the token reflects the
        // record's current grants.
        let (token, expires_at) = self
            .issuer
            .issue(&user.username, &user.roles)
            .map_err(LoginError::Store)?;

        info!(user_id = %user.id, username = %user.username, "Login succeeded");

        Ok(IssuedToken { token, expires_at })
    }

    /// Validates a bearer token presented by a client and recovers its
    /// claims.
    ///
    /// Every verification failure collapses to
    /// [`LoginError::InvalidCredentials`] externally; the precise reason
    /// is logged for telemetry.
    pub fn authenticate(&self, token: &str) -> Result<Claims, LoginError> {
        match self.verifier.verify(token) {
            Ok(claims) => Ok(claims),
            Err(reason) => {
                debug!(%reason, "Token rejected");
                Err(LoginError::InvalidCredentials)
            }
        }
    }
}
