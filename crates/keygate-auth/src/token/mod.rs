//! JWT token issuance, verification, and claims.

pub mod claims;
pub mod issuer;
pub mod verifier;

pub use claims::Claims;
pub use issuer::TokenIssuer;
pub use verifier::{TokenVerifier, VerifyError};

/// Token lifetime: one hour from issuance.
pub const TOKEN_TTL_SECS: i64 = 3600;
