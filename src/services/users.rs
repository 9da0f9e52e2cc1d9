//! User directory service
//!
//! Profiles live in the `users` collection, keyed by the identity
//! provider's account id. The role lookup is the gate for admin-only
//! surfaces, so it works on the raw document: a profile without a `role`
//! field resolves to `None`, exactly like a missing profile, while a store
//! failure stays an error.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::models::user::{Role, UserProfile};
use crate::store::{collections, DocumentStore};
use crate::utils::errors::Result;

/// Service for user profiles and role resolution
#[derive(Clone)]
pub struct UserDirectory {
    store: Arc<dyn DocumentStore>,
}

impl UserDirectory {
    /// Create a new UserDirectory instance
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Write a profile record keyed by the account id
    pub async fn create_profile(&self, profile: &UserProfile) -> Result<()> {
        let data = serde_json::to_value(profile)?;
        self.store
            .put(collections::USERS, &profile.uid, data)
            .await?;
        info!(uid = %profile.uid, email = %profile.email, "User profile created");
        Ok(())
    }

    /// Fetch a profile by account id
    pub async fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>> {
        let document = self.store.get(collections::USERS, uid).await?;
        match document {
            Some(document) => {
                let mut profile: UserProfile = serde_json::from_value(document.data)?;
                if profile.uid.is_empty() {
                    profile.uid = document.id;
                }
                Ok(Some(profile))
            }
            None => Ok(None),
        }
    }

    /// Resolve the platform role for an account id.
    ///
    /// `Ok(None)` covers both "no such user" and "profile without a role
    /// field". Not cached: callers re-fetch on every gate check.
    pub async fn get_role(&self, uid: &str) -> Result<Option<Role>> {
        let document = self.store.get(collections::USERS, uid).await?;
        let role = document
            .as_ref()
            .and_then(|d| d.data.get("role"))
            .and_then(|v| v.as_str())
            .and_then(|s| {
                let parsed = Role::parse(s);
                if parsed.is_none() {
                    warn!(uid = uid, role = s, "Unrecognized role value on profile");
                }
                parsed
            });
        debug!(uid = uid, role = ?role, "Resolved user role");
        Ok(role)
    }

    /// List every profile in the directory
    pub async fn list_users(&self) -> Result<Vec<UserProfile>> {
        let documents = self.store.list(collections::USERS).await?;
        let mut users = Vec::with_capacity(documents.len());
        for document in documents {
            match serde_json::from_value::<UserProfile>(document.data) {
                Ok(mut profile) => {
                    if profile.uid.is_empty() {
                        profile.uid = document.id;
                    }
                    users.push(profile);
                }
                Err(e) => {
                    warn!(uid = %document.id, error = %e, "Skipping undecodable user document");
                }
            }
        }
        Ok(users)
    }
}
