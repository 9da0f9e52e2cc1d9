//! Document store access
//!
//! The platform keeps all persistent data in an external document store
//! organized as named collections of JSON records. This module defines the
//! store interface plus two implementations: an HTTP client for the managed
//! backend and an in-process store used by tests.

pub mod http;
pub mod memory;

pub use http::HttpStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::errors::StoreResult;

/// Collection names used by the application
pub mod collections {
    pub const EVENTS: &str = "events";
    pub const USERS: &str = "users";
    pub const REGISTRATIONS: &str = "registrations";
}

/// A raw document together with its store-assigned identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

/// Equality filter used by [`DocumentStore::query_eq`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldFilter {
    pub field: String,
    pub value: Value,
}

impl FieldFilter {
    pub fn new(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Interface to the external document store.
///
/// Failures are surfaced as errors, never folded into empty results, so a
/// caller can always tell "found nothing" apart from "the store was
/// unreachable".
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// List every document in a collection, in store-default order.
    async fn list(&self, collection: &str) -> StoreResult<Vec<Document>>;

    /// Fetch a single document by id. `Ok(None)` when the id is unknown.
    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>>;

    /// Documents matching all of the given equality filters.
    async fn query_eq(&self, collection: &str, filters: &[FieldFilter])
        -> StoreResult<Vec<Document>>;

    /// Insert a document with a store-generated id, which is returned.
    async fn add(&self, collection: &str, data: Value) -> StoreResult<String>;

    /// Full overwrite of the document at `id`, creating it if missing.
    async fn put(&self, collection: &str, id: &str, data: Value) -> StoreResult<()>;

    /// Create the document at `id` only if no document with that id exists.
    ///
    /// Fails with [`StoreError::Conflict`] otherwise. This is the primitive
    /// behind the registration uniqueness rule.
    ///
    /// [`StoreError::Conflict`]: crate::utils::errors::StoreError::Conflict
    async fn create(&self, collection: &str, id: &str, data: Value) -> StoreResult<()>;

    /// Delete the document at `id`. Deleting an unknown id is not an error.
    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()>;
}
