//! Password policy enforcement for new passwords.

use serde::Serialize;
use thiserror::Error;

use keygate_core::config::auth::AuthConfig;

/// A single failed password-complexity rule.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum PolicyViolation {
    /// The password is shorter than the configured minimum.
    #[error("password must be at least {min} characters long")]
    TooShort {
        /// The configured minimum length.
        min: usize,
    },
    /// No lowercase letter present.
    #[error("password must contain at least one lowercase letter")]
    MissingLowercase,
    /// No uppercase letter present.
    #[error("password must contain at least one uppercase letter")]
    MissingUppercase,
    /// No digit present.
    #[error("password must contain at least one digit")]
    MissingDigit,
    /// No symbol from the configured special-character set present.
    #[error("password must contain at least one of: {allowed}")]
    MissingSpecial {
        /// The accepted special characters.
        allowed: String,
    },
}

/// Validates password strength against configured policies.
///
/// Validation is a pure function of the configuration and the candidate
/// password; every violated rule is reported so the caller can present
/// complete feedback in one pass.
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    /// Minimum password length.
    min_length: usize,
    /// Characters accepted as the required symbol.
    special_chars: String,
}

impl PasswordPolicy {
    /// Creates a new policy from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
            special_chars: config.password_special_chars.clone(),
        }
    }

    /// Validates a password against all configured rules.
    ///
    /// Returns `Ok(())` if the password meets every requirement, or the
    /// full list of violated rules.
    pub fn validate(&self, password: &str) -> Result<(), Vec<PolicyViolation>> {
        let mut violations = Vec::new();

        if password.chars().count() < self.min_length {
            violations.push(PolicyViolation::TooShort {
                min: self.min_length,
            });
        }

        if !password.chars().any(|c| c.is_lowercase()) {
            violations.push(PolicyViolation::MissingLowercase);
        }

        if !password.chars().any(|c| c.is_uppercase()) {
            violations.push(PolicyViolation::MissingUppercase);
        }

        if !password.chars().any(|c| c.is_ascii_digit()) {
            violations.push(PolicyViolation::MissingDigit);
        }

        if !password.chars().any(|c| self.special_chars.contains(c)) {
            violations.push(PolicyViolation::MissingSpecial {
                allowed: self.special_chars.clone(),
            });
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}
