//! Data models

pub mod event;
pub mod registration;
pub mod user;

pub use event::{Event, EventDraft};
pub use registration::{AttendeeRole, Registration, RegistrationForm};
pub use user::{Role, SignUpRequest, UserProfile};
