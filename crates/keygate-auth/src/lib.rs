//! # keygate-auth
//!
//! The authentication core for Keygate: password credential handling and
//! signed-token issuance/validation.
//!
//! ## Modules
//!
//! - `password` — Argon2id password hashing and policy enforcement
//! - `token` — JWT token issuance and verification (HS256)

pub mod password;
pub mod token;

pub use password::{PasswordHasher, PasswordPolicy, PolicyViolation};
pub use token::{Claims, TokenIssuer, TokenVerifier, VerifyError};
