//! User entity model.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered identity in the Keygate credential store.
///
/// The username is immutable after creation and unique
/// case-insensitively. Roles are assigned by an external
/// role-management collaborator and start out empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique record identifier.
    pub id: Uuid,
    /// Unique login name.
    pub username: String,
    /// Email address. Format-checked at registration; uniqueness is a
    /// store-level choice and not enforced here.
    pub email: String,
    /// Opaque PHC-format password hash. Never serialized outward.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Role names assigned to this identity, without duplicates.
    pub roles: BTreeSet<String>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether this identity carries the given role.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

/// Data required to create a new identity record.
///
/// Roles are deliberately absent: every record starts with an empty
/// role set, and role grants go through the store's update operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    /// Desired username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
}
