//! # keygate-database
//!
//! The [`CredentialStore`] persistence seam and its concrete backends:
//! PostgreSQL for production and an in-memory map for tests and
//! single-node deployments.

pub mod connection;
pub mod migration;
pub mod store;
pub mod stores;

pub use store::CredentialStore;
pub use stores::memory::MemoryCredentialStore;
pub use stores::postgres::PgCredentialStore;
