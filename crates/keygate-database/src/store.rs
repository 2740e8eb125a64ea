//! The credential store trait — the persistence seam for identity records.

use std::collections::BTreeSet;

use async_trait::async_trait;
use uuid::Uuid;

use keygate_core::result::AppResult;
use keygate_entity::user::{NewUser, User};

/// Persistence abstraction holding identity records.
///
/// Implementations must make [`create`](CredentialStore::create) atomic
/// with respect to concurrent creation of the same username: when two
/// callers race, exactly one wins and the other receives a
/// `Conflict` error. Username lookups are case-insensitive.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Find an identity record by username (case-insensitive).
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Create a new identity record with an empty role set.
    ///
    /// Returns a `Conflict` error if the username is already taken,
    /// including when a concurrent caller won the race.
    async fn create(&self, new_user: NewUser) -> AppResult<User>;

    /// Replace the role set of an identity record.
    ///
    /// This is the seam used by the external role-management
    /// collaborator; the authentication core itself never mutates roles.
    async fn update_roles(&self, id: Uuid, roles: BTreeSet<String>) -> AppResult<User>;

    /// Count stored identity records.
    async fn count(&self) -> AppResult<u64>;
}
