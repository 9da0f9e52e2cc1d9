//! Event list view model
//!
//! Observable list of events backing the browse and admin screens. The
//! list moves `Empty -> Loading -> Loaded` once at construction; after
//! that the only transition back through `Loading` is the full re-fetch
//! following a delete.

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::models::event::Event;
use crate::services::events::EventService;
use crate::utils::errors::Result;

/// Loading state of the event list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventListState {
    Empty,
    Loading,
    Loaded(Vec<Event>),
}

impl EventListState {
    /// Events in this state; empty unless `Loaded`
    pub fn events(&self) -> &[Event] {
        match self {
            EventListState::Loaded(events) => events,
            _ => &[],
        }
    }
}

/// Observable event list, loaded once on construction
pub struct EventListModel {
    events: EventService,
    tx: watch::Sender<EventListState>,
}

impl EventListModel {
    /// Create the model and perform the initial load.
    ///
    /// A failed initial load leaves the model in `Empty` and returns the
    /// error alongside the model so the caller can decide what to
    /// surface; the model itself stays usable.
    pub async fn new(events: EventService) -> (Self, Result<()>) {
        let (tx, _) = watch::channel(EventListState::Empty);
        let model = Self { events, tx };
        let outcome = model.reload().await;
        (model, outcome)
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> watch::Receiver<EventListState> {
        self.tx.subscribe()
    }

    /// Snapshot of the current state
    pub fn state(&self) -> EventListState {
        self.tx.borrow().clone()
    }

    /// Snapshot of the current event list
    pub fn events(&self) -> Vec<Event> {
        self.tx.borrow().events().to_vec()
    }

    /// Re-fetch the full list from the store.
    ///
    /// On failure the previous list is restored, so observers see stale
    /// data rather than an empty flash, and the error is returned.
    pub async fn reload(&self) -> Result<()> {
        let previous = self.tx.borrow().clone();
        self.tx.send_replace(EventListState::Loading);

        match self.events.list_events().await {
            Ok(events) => {
                debug!(count = events.len(), "Event list reloaded");
                self.tx.send_replace(EventListState::Loaded(events));
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Event list reload failed");
                self.tx.send_replace(previous);
                Err(e)
            }
        }
    }

    /// Delete an event, then re-fetch the full list.
    ///
    /// An event that was never saved has no identifier and the call is a
    /// no-op. The re-fetch happens whether or not the delete succeeded;
    /// the list always ends up equal to a fresh load, so a silently
    /// failed delete shows back up.
    pub async fn delete_event(&self, event: &Event) -> Result<()> {
        let Some(id) = event.id.as_deref() else {
            debug!(title = %event.title, "Delete requested for unsaved event; ignoring");
            return Ok(());
        };

        if let Err(e) = self.events.delete_event(id).await {
            warn!(event_id = id, error = %e, "Event delete failed; re-fetching list anyway");
        }
        self.reload().await
    }
}
