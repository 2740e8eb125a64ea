//! Argon2id password hashing and verification.

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use tracing::warn;

use keygate_core::error::AppError;

/// Handles password hashing and verification using Argon2id.
#[derive(Debug, Clone)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Creates a new password hasher instance.
    pub fn new() -> Self {
        Self
    }

    /// Hashes a plaintext password using Argon2id with a random salt.
    ///
    /// The salt and parameters are embedded in the returned PHC string,
    /// so no external salt storage is needed.
    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    /// Verifies a plaintext password against a stored Argon2id hash.
    ///
    /// A malformed stored hash counts as a non-match rather than an
    /// error, so a corrupted record degrades to a failed login instead
    /// of aborting the caller. The underlying digest comparison is
    /// constant-time.
    pub fn verify_password(&self, password: &str, stored: &str) -> bool {
        let parsed = match PasswordHash::new(stored) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "Stored password hash is malformed; treating as non-match");
                return false;
            }
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify_roundtrip() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash_password("Abcdef1!").unwrap();

        assert!(hasher.verify_password("Abcdef1!", &hash));
        assert!(!hasher.verify_password("wrongpass", &hash));
    }

    #[test]
    fn test_salt_is_per_call() {
        let hasher = PasswordHasher::new();
        let first = hasher.hash_password("Abcdef1!").unwrap();
        let second = hasher.hash_password("Abcdef1!").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify_password("Abcdef1!", &first));
        assert!(hasher.verify_password("Abcdef1!", &second));
    }

    #[test]
    fn test_hash_output_is_opaque() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash_password("Abcdef1!").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("Abcdef1!"));
    }

    #[test]
    fn test_malformed_hash_is_non_match() {
        let hasher = PasswordHasher::new();
        assert!(!hasher.verify_password("Abcdef1!", "not-a-phc-string"));
        assert!(!hasher.verify_password("Abcdef1!", ""));
    }
}
