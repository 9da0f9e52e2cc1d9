//! Event data access service
//!
//! Typed CRUD over the `events` collection. Documents that fail to decode
//! are skipped with a warning rather than failing the whole listing, since
//! the collection is hand-edited through admin tooling.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::models::event::{Event, EventDraft};
use crate::store::{collections, DocumentStore};
use crate::utils::errors::{CampusError, Result};

/// Service for reading and mutating events
#[derive(Clone)]
pub struct EventService {
    store: Arc<dyn DocumentStore>,
}

impl EventService {
    /// Create a new EventService instance
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// List all events in store-default order
    pub async fn list_events(&self) -> Result<Vec<Event>> {
        let documents = self.store.list(collections::EVENTS).await?;
        let mut events = Vec::with_capacity(documents.len());
        for document in documents {
            match serde_json::from_value::<Event>(document.data) {
                Ok(event) => events.push(event.with_id(document.id)),
                Err(e) => {
                    warn!(event_id = %document.id, error = %e, "Skipping undecodable event document");
                }
            }
        }
        debug!(count = events.len(), "Listed events");
        Ok(events)
    }

    /// Fetch a single event by its store identifier
    pub async fn get_event(&self, id: &str) -> Result<Option<Event>> {
        let document = self.store.get(collections::EVENTS, id).await?;
        match document {
            Some(document) => {
                let event: Event = serde_json::from_value(document.data)?;
                Ok(Some(event.with_id(document.id)))
            }
            None => Ok(None),
        }
    }

    /// Create a new event; the store assigns the identifier
    pub async fn create_event(&self, draft: EventDraft) -> Result<Event> {
        draft.validate().map_err(CampusError::InvalidInput)?;

        let data = serde_json::to_value(&draft)?;
        let id = self.store.add(collections::EVENTS, data).await?;
        info!(event_id = %id, title = %draft.title, "Event created");

        Ok(Event {
            id: Some(id),
            title: draft.title,
            date: draft.date,
            location: draft.location,
            description: draft.description,
        })
    }

    /// Fully overwrite an existing event
    pub async fn update_event(&self, id: &str, draft: EventDraft) -> Result<Event> {
        draft.validate().map_err(CampusError::InvalidInput)?;

        let data = serde_json::to_value(&draft)?;
        self.store.put(collections::EVENTS, id, data).await?;
        info!(event_id = %id, title = %draft.title, "Event updated");

        Ok(Event {
            id: Some(id.to_string()),
            title: draft.title,
            date: draft.date,
            location: draft.location,
            description: draft.description,
        })
    }

    /// Delete an event by its store identifier
    pub async fn delete_event(&self, id: &str) -> Result<()> {
        self.store.delete(collections::EVENTS, id).await?;
        info!(event_id = %id, "Event deleted");
        Ok(())
    }
}
