//! Event model

use serde::{Deserialize, Serialize};

/// An event as stored in the `events` collection.
///
/// The identifier is assigned by the store and attached after a read; an
/// event with `id: None` has not been persisted yet. All other fields are
/// free-form text entered through the admin form, so missing fields in a
/// stored document decode as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(skip)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
}

impl Event {
    /// Attach the store-assigned document id to a decoded event
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Payload for creating or fully overwriting an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    pub date: String,
    pub location: String,
    pub description: String,
}

impl EventDraft {
    /// Admin form rule: title and date must be filled in
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() || self.date.trim().is_empty() {
            return Err("Title and date are required".to_string());
        }
        Ok(())
    }
}
