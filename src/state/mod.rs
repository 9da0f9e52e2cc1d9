//! Observable application state
//!
//! View-model style state holders consumed by presentation layers: the
//! signed-in session and the event list. Both publish through watch
//! channels so a screen can subscribe to changes without polling.

pub mod events;
pub mod session;

pub use events::{EventListModel, EventListState};
pub use session::{Session, SessionHandle};
