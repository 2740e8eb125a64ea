//! Authentication configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Minimum signing secret length in bytes (256 bits).
pub const MIN_SECRET_BYTES: usize = 32;

/// Authentication and credential configuration.
///
/// `jwt_secret` deliberately has no default: a process without a signing
/// secret must fail at startup, not issue unverifiable tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for token signing (HMAC-SHA256). Required.
    pub jwt_secret: String,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Characters accepted as the required password symbol.
    #[serde(default = "default_special_chars")]
    pub password_special_chars: String,
}

impl AuthConfig {
    /// Check the secret meets the minimum entropy requirement.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.jwt_secret.len() < MIN_SECRET_BYTES {
            return Err(AppError::configuration(format!(
                "Signing secret must be at least {MIN_SECRET_BYTES} bytes"
            )));
        }
        Ok(())
    }
}

fn default_password_min() -> usize {
    8
}

fn default_special_chars() -> String {
    "!@#$%^&*()-_=+[]{};:,.<>?".to_string()
}
