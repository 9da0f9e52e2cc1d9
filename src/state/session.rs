//! Session state
//!
//! The session is an explicit value handed to whoever needs it rather
//! than a process-wide singleton: the auth service produces one, the
//! owning scope stores it in a [`SessionHandle`], and consumers either
//! take a snapshot or subscribe to changes.

use tokio::sync::watch;

use crate::models::user::Role;

/// A completed sign-in: account identity plus the role resolved from the
/// user directory. The role is filled in before the session is published,
/// so observers never see a logged-in session with a pending role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub uid: String,
    pub email: String,
    pub display_name: String,
    /// `None` when the profile record is missing or carries no role field.
    pub role: Option<Role>,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }
}

/// Observable holder for the current session
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: watch::Sender<Option<Session>>,
}

impl SessionHandle {
    /// Create a handle with no signed-in session
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx }
    }

    /// Subscribe to session changes
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.tx.subscribe()
    }

    /// Snapshot of the current session
    pub fn current(&self) -> Option<Session> {
        self.tx.borrow().clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.tx.borrow().is_some()
    }

    pub(crate) fn set(&self, session: Session) {
        self.tx.send_replace(Some(session));
    }

    pub(crate) fn clear(&self) {
        self.tx.send_replace(None);
    }
}

impl Default for SessionHandle {
    fn default() -> Self {
        Self::new()
    }
}
