//! In-memory credential store backend.
//!
//! Used by tests and single-node deployments. Records are keyed by
//! lowercased username so uniqueness matches the case-insensitive
//! semantics of the PostgreSQL backend.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use keygate_core::error::AppError;
use keygate_core::result::AppResult;
use keygate_entity::user::{NewUser, User};

use crate::store::CredentialStore;

/// Credential store backed by a concurrent in-process map.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    /// Records keyed by lowercased username.
    users: DashMap<String, User>,
}

impl MemoryCredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .get(&username.to_lowercase())
            .map(|entry| entry.value().clone()))
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let key = new_user.username.to_lowercase();

        // The entry API holds the shard lock across the occupancy check
        // and the insert, so two racing creates of the same username
        // cannot both succeed.
        match self.users.entry(key) {
            Entry::Occupied(_) => Err(AppError::conflict(format!(
                "Username '{}' already exists",
                new_user.username
            ))),
            Entry::Vacant(slot) => {
                let now = Utc::now();
                let user = User {
                    id: Uuid::new_v4(),
                    username: new_user.username,
                    email: new_user.email,
                    password_hash: new_user.password_hash,
                    roles: BTreeSet::new(),
                    created_at: now,
                    updated_at: now,
                };
                slot.insert(user.clone());
                Ok(user)
            }
        }
    }

    async fn update_roles(&self, id: Uuid, roles: BTreeSet<String>) -> AppResult<User> {
        match self.users.iter_mut().find(|entry| entry.id == id) {
            Some(mut entry) => {
                entry.roles = roles;
                entry.updated_at = Utc::now();
                Ok(entry.value().clone())
            }
            None => Err(AppError::not_found(format!("User {id} not found"))),
        }
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.users.len() as u64)
    }
}
