//! # keygate-service
//!
//! Flow orchestration for Keygate. The registration and login services
//! compose the credential store, password policy, hasher, and token
//! issuer/verifier into the two flows an embedding request layer calls.
//!
//! Services follow constructor injection — all dependencies are provided
//! at construction time via `Arc` references.

pub mod login;
pub mod registration;

pub use login::{IssuedToken, LoginError, LoginRequest, LoginService};
pub use registration::{
    RegisterError, RegisterRequest, RegistrationReceipt, RegistrationService,
};
