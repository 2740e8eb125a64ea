//! Registration flow — validate, hash, and store a new identity.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use keygate_auth::password::{PasswordHasher, PasswordPolicy, PolicyViolation};
use keygate_core::error::{AppError, ErrorKind};
use keygate_database::store::CredentialStore;
use keygate_entity::user::NewUser;

/// Input for the registration flow.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct RegisterRequest {
    /// Desired username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Candidate password.
    pub password: String,
    /// Must match `password` exactly.
    pub confirm_password: String,
}

/// Acknowledgment of a completed registration.
///
/// Carries identity metadata only — never the hash or the plaintext.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RegistrationReceipt {
    /// The new record's identifier.
    pub id: Uuid,
    /// The registered username.
    pub username: String,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

/// Why a registration was rejected.
#[derive(Debug, Error)]
pub enum RegisterError {
    /// The username is already registered (case-insensitively).
    #[error("username is already taken")]
    UsernameTaken,
    /// The username is empty or too short.
    #[error("username must be at least 3 characters")]
    InvalidUsername,
    /// The email address is not plausibly formatted.
    #[error("email address is not valid")]
    InvalidEmail,
    /// Password and confirmation differ.
    #[error("password confirmation does not match")]
    ConfirmationMismatch,
    /// The password violates one or more policy rules; every violated
    /// rule is listed.
    #[error("password does not meet policy requirements")]
    PolicyViolations(Vec<PolicyViolation>),
    /// The credential store failed; retryable per its error kind.
    #[error(transparent)]
    Store(#[from] AppError),
}

/// Orchestrates the registration flow: uniqueness check, confirmation
/// check, email format check, policy validation, hashing, and the single
/// atomic store write.
#[derive(Clone)]
pub struct RegistrationService {
    /// Credential store.
    store: Arc<dyn CredentialStore>,
    /// Password policy engine.
    policy: PasswordPolicy,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
}

impl std::fmt::Debug for RegistrationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationService")
            .field("policy", &self.policy)
            .finish()
    }
}

impl RegistrationService {
    /// Creates a new registration service.
    pub fn new(
        store: Arc<dyn CredentialStore>,
        policy: PasswordPolicy,
        hasher: Arc<PasswordHasher>,
    ) -> Self {
        Self {
            store,
            policy,
            hasher,
        }
    }

    /// Runs the registration flow.
    ///
    /// The only write is the store's atomic create, so an abandoned or
    /// failed registration never leaves a partial record behind. A race
    /// lost at create time surfaces as [`RegisterError::UsernameTaken`],
    /// the same as an up-front duplicate.
    pub async fn register(
        &self,
        req: RegisterRequest,
    ) -> Result<RegistrationReceipt, RegisterError> {
        let username = req.username.trim();
        if username.len() < 3 {
            return Err(RegisterError::InvalidUsername);
        }

        if self.store.find_by_username(username).await?.is_some() {
            return Err(RegisterError::UsernameTaken);
        }

        if req.password != req.confirm_password {
            return Err(RegisterError::ConfirmationMismatch);
        }

        if !is_valid_email(&req.email) {
            return Err(RegisterError::InvalidEmail);
        }

        self.policy
            .validate(&req.password)
            .map_err(RegisterError::PolicyViolations)?;

        // Hashing is deliberately slow; keep it off the async workers.
        let hasher = self.hasher.clone();
        let password = req.password;
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash_password(&password))
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "Hashing task panicked", e))??;

        let user = self
            .store
            .create(NewUser {
                username: username.to_string(),
                email: req.email,
                password_hash,
            })
            .await
            .map_err(|e| {
                if e.kind == ErrorKind::Conflict {
                    RegisterError::UsernameTaken
                } else {
                    RegisterError::Store(e)
                }
            })?;

        info!(user_id = %user.id, username = %user.username, "User registered");

        Ok(RegistrationReceipt {
            id: user.id,
            username: user.username,
            created_at: user.created_at,
        })
    }
}

/// Plausibility check for an email address: non-empty local part and a
/// dot-bearing domain, no whitespace.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}
