//! Identity provider access
//!
//! Credentials and session tokens are owned by an external identity
//! service; this module only consumes its account operations. Failures
//! carry the provider's message string so auth flows can surface it
//! verbatim.

pub mod http;
pub mod memory;

pub use http::HttpIdentity;
pub use memory::MemoryIdentity;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::utils::errors::IdentityResult;

/// An authenticated account as reported by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub uid: String,
    pub email: String,
    #[serde(default)]
    pub display_name: String,
}

/// Interface to the external identity provider
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create a new account from email and password
    async fn create_account(&self, email: &str, password: &str) -> IdentityResult<Account>;

    /// Check credentials and open a session
    async fn sign_in(&self, email: &str, password: &str) -> IdentityResult<Account>;

    /// Close the account's session
    async fn sign_out(&self, uid: &str) -> IdentityResult<()>;

    /// The currently signed-in account, if any
    async fn current_account(&self) -> IdentityResult<Option<Account>>;

    /// Update the account's display name
    async fn update_display_name(&self, uid: &str, name: &str) -> IdentityResult<()>;
}
