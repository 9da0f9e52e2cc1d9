//! In-memory document store
//!
//! A process-local [`DocumentStore`] used by the test suites. Collections
//! are ordered maps, so listing order is deterministic. Failures can be
//! injected per call class to exercise the error paths of the services.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::store::{Document, DocumentStore, FieldFilter};
use crate::utils::errors::{StoreError, StoreResult};

type Collections = HashMap<String, BTreeMap<String, Value>>;

/// In-memory store with failure injection for tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: Arc<Mutex<Collections>>,
    fail_all: Arc<AtomicBool>,
    fail_deletes: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `ServiceUnavailable`
    pub fn fail_everything(&self, fail: bool) {
        self.fail_all.store(fail, Ordering::SeqCst);
    }

    /// Make only delete calls fail, leaving reads working
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Number of documents currently held in a collection
    pub fn count(&self, collection: &str) -> usize {
        let collections = self.collections.lock().unwrap();
        collections.get(collection).map_or(0, |c| c.len())
    }

    /// Seed a document at a fixed id, bypassing failure injection
    pub fn seed(&self, collection: &str, id: &str, data: Value) {
        let mut collections = self.collections.lock().unwrap();
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), data);
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.fail_all.load(Ordering::SeqCst) {
            return Err(StoreError::ServiceUnavailable);
        }
        Ok(())
    }

    fn matches(data: &Value, filters: &[FieldFilter]) -> bool {
        filters
            .iter()
            .all(|f| data.get(&f.field) == Some(&f.value))
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list(&self, collection: &str) -> StoreResult<Vec<Document>> {
        self.check_available()?;
        let collections = self.collections.lock().unwrap();
        let documents = collections
            .get(collection)
            .map(|c| {
                c.iter()
                    .map(|(id, data)| Document {
                        id: id.clone(),
                        data: data.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(documents)
    }

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        self.check_available()?;
        let collections = self.collections.lock().unwrap();
        Ok(collections.get(collection).and_then(|c| {
            c.get(id).map(|data| Document {
                id: id.to_string(),
                data: data.clone(),
            })
        }))
    }

    async fn query_eq(
        &self,
        collection: &str,
        filters: &[FieldFilter],
    ) -> StoreResult<Vec<Document>> {
        self.check_available()?;
        let collections = self.collections.lock().unwrap();
        let documents = collections
            .get(collection)
            .map(|c| {
                c.iter()
                    .filter(|(_, data)| Self::matches(data, filters))
                    .map(|(id, data)| Document {
                        id: id.clone(),
                        data: data.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(documents)
    }

    async fn add(&self, collection: &str, data: Value) -> StoreResult<String> {
        self.check_available()?;
        let id = Uuid::new_v4().to_string();
        let mut collections = self.collections.lock().unwrap();
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), data);
        Ok(id)
    }

    async fn put(&self, collection: &str, id: &str, data: Value) -> StoreResult<()> {
        self.check_available()?;
        let mut collections = self.collections.lock().unwrap();
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), data);
        Ok(())
    }

    async fn create(&self, collection: &str, id: &str, data: Value) -> StoreResult<()> {
        self.check_available()?;
        let mut collections = self.collections.lock().unwrap();
        let entries = collections.entry(collection.to_string()).or_default();
        if entries.contains_key(id) {
            return Err(StoreError::Conflict {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        entries.insert(id.to_string(), data);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        self.check_available()?;
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StoreError::ServiceUnavailable);
        }
        let mut collections = self.collections.lock().unwrap();
        if let Some(entries) = collections.get_mut(collection) {
            entries.remove(id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[tokio::test]
    async fn test_add_and_get_round_trip() {
        let store = MemoryStore::new();
        let id = store
            .add("events", json!({"title": "Spring Fest"}))
            .await
            .unwrap();

        let document = store.get("events", &id).await.unwrap().unwrap();
        assert_eq!(document.data["title"], "Spring Fest");
        assert!(store.get("events", "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_existing_id() {
        let store = MemoryStore::new();
        store
            .create("registrations", "k1", json!({"a": 1}))
            .await
            .unwrap();

        let err = store
            .create("registrations", "k1", json!({"a": 2}))
            .await
            .unwrap_err();
        assert_matches!(err, StoreError::Conflict { .. });
        assert_eq!(store.count("registrations"), 1);
    }

    #[tokio::test]
    async fn test_query_eq_matches_all_filters() {
        let store = MemoryStore::new();
        store.seed("registrations", "r1", json!({"eventId": "e1", "userEmail": "a@x.com"}));
        store.seed("registrations", "r2", json!({"eventId": "e1", "userEmail": "b@x.com"}));

        let filters = [
            FieldFilter::new("eventId", "e1"),
            FieldFilter::new("userEmail", "a@x.com"),
        ];
        let matched = store.query_eq("registrations", &filters).await.unwrap();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, "r1");
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let store = MemoryStore::new();
        store.seed("events", "e1", json!({"title": "x"}));

        store.fail_deletes(true);
        assert_matches!(
            store.delete("events", "e1").await,
            Err(StoreError::ServiceUnavailable)
        );
        // Reads still work while deletes are failing.
        assert_eq!(store.list("events").await.unwrap().len(), 1);

        store.fail_everything(true);
        assert_matches!(
            store.list("events").await,
            Err(StoreError::ServiceUnavailable)
        );
    }
}
