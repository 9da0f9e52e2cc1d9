//! Campus Events core
//!
//! Client-side core for a college events platform: users sign up and
//! browse events, register for them, and admins manage events, users and
//! registrations. Persistence and credentials are delegated to an
//! external document store and identity provider; this library provides
//! the typed access layers, the session and event-list view models, and
//! the registration uniqueness rule on top of them.

pub mod config;
pub mod identity;
pub mod models;
pub mod services;
pub mod state;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{CampusError, Result};

// Re-export main components for easy access
pub use services::ServiceFactory;
pub use state::{EventListModel, EventListState, Session, SessionHandle};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
