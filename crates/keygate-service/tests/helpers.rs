//! Shared test helpers for flow integration tests.

use std::sync::Arc;

use keygate_auth::password::{PasswordHasher, PasswordPolicy};
use keygate_auth::token::{TokenIssuer, TokenVerifier};
use keygate_core::config::auth::AuthConfig;
use keygate_database::MemoryCredentialStore;
use keygate_database::store::CredentialStore;
use keygate_service::{LoginService, RegisterRequest, RegistrationService};

/// Test harness wiring the full flow stack over the in-memory store.
pub struct TestHarness {
    /// The shared credential store, kept for direct inspection.
    pub store: Arc<MemoryCredentialStore>,
    /// Registration flow under test.
    pub registration: RegistrationService,
    /// Login flow under test.
    pub login: LoginService,
}

impl TestHarness {
    /// Build a harness with the default policy and a fixed test secret.
    pub fn new() -> Self {
        let config = AuthConfig {
            jwt_secret: "flow-test-signing-secret-32-bytes!!".to_string(),
            password_min_length: 8,
            password_special_chars: "!@#$%^&*()-_=+[]{};:,.<>?".to_string(),
        };

        let store = Arc::new(MemoryCredentialStore::new());
        let hasher = Arc::new(PasswordHasher::new());
        let policy = PasswordPolicy::new(&config);
        let issuer = Arc::new(TokenIssuer::new(&config).expect("valid test secret"));
        let verifier = Arc::new(TokenVerifier::new(&config).expect("valid test secret"));

        let registration = RegistrationService::new(
            store.clone() as Arc<dyn CredentialStore>,
            policy,
            hasher.clone(),
        );
        let login = LoginService::new(
            store.clone() as Arc<dyn CredentialStore>,
            hasher,
            issuer,
            verifier,
        )
        .expect("decoy hash");

        Self {
            store,
            registration,
            login,
        }
    }
}

/// Convenience constructor for a registration request.
pub fn register_request(username: &str, password: &str, confirm: &str) -> RegisterRequest {
    RegisterRequest {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password: password.to_string(),
        confirm_password: confirm.to_string(),
    }
}
