//! Admin data management service
//!
//! Role-gated access to the three collections for the admin surface:
//! bulk loading, registration filtering, and event add/edit/delete. The
//! role is re-fetched from the directory on every call rather than
//! trusted from the session, so an out-of-band demotion takes effect on
//! the next operation.

use futures::future::try_join3;
use tracing::debug;

use crate::config::FeaturesConfig;
use crate::models::event::{Event, EventDraft};
use crate::models::registration::Registration;
use crate::models::user::{Role, UserProfile};
use crate::services::events::EventService;
use crate::services::registration::RegistrationService;
use crate::services::users::UserDirectory;
use crate::state::session::Session;
use crate::utils::errors::{CampusError, Result};
use crate::utils::logging::log_admin_action;

/// Everything the admin surface displays, loaded in one shot
#[derive(Debug, Clone)]
pub struct AdminOverview {
    pub registrations: Vec<Registration>,
    pub users: Vec<UserProfile>,
    pub events: Vec<Event>,
}

/// Substring filters applied to the registration listing.
///
/// Blank filters match everything; matching is case-insensitive on the
/// event reference and the attendee role.
#[derive(Debug, Clone, Default)]
pub struct RegistrationFilter {
    pub event: String,
    pub role: String,
}

impl RegistrationFilter {
    fn matches(&self, registration: &Registration) -> bool {
        let event_ok = self.event.trim().is_empty()
            || registration
                .event_id
                .to_lowercase()
                .contains(&self.event.trim().to_lowercase());
        let role_ok = self.role.trim().is_empty()
            || registration
                .role
                .as_str()
                .to_lowercase()
                .contains(&self.role.trim().to_lowercase());
        event_ok && role_ok
    }
}

/// Filter a registration listing for display
pub fn filter_registrations<'a>(
    registrations: &'a [Registration],
    filter: &RegistrationFilter,
) -> Vec<&'a Registration> {
    registrations.iter().filter(|r| filter.matches(r)).collect()
}

/// Service for admin-only data management
#[derive(Clone)]
pub struct AdminService {
    events: EventService,
    users: UserDirectory,
    registrations: RegistrationService,
    features: FeaturesConfig,
}

impl AdminService {
    /// Create a new AdminService instance
    pub fn new(
        events: EventService,
        users: UserDirectory,
        registrations: RegistrationService,
        features: FeaturesConfig,
    ) -> Self {
        Self {
            events,
            users,
            registrations,
            features,
        }
    }

    /// Require an admin role for the session, re-fetched from the store
    async fn require_admin(&self, session: &Session) -> Result<()> {
        if !self.features.admin_panel {
            return Err(CampusError::PermissionDenied(
                "Admin panel is disabled".to_string(),
            ));
        }

        let role = self.users.get_role(&session.uid).await?;
        if role != Some(Role::Admin) {
            debug!(uid = %session.uid, role = ?role, "Admin access denied");
            return Err(CampusError::PermissionDenied(format!(
                "User {} is not an admin",
                session.uid
            )));
        }
        Ok(())
    }

    /// Load registrations, users and events for the admin surface
    pub async fn overview(&self, session: &Session) -> Result<AdminOverview> {
        self.require_admin(session).await?;

        let (registrations, users, events) = try_join3(
            self.registrations.list_all(),
            self.users.list_users(),
            self.events.list_events(),
        )
        .await?;

        Ok(AdminOverview {
            registrations,
            users,
            events,
        })
    }

    /// Add a new event through the admin form
    pub async fn add_event(&self, session: &Session, draft: EventDraft) -> Result<Event> {
        self.require_admin(session).await?;
        let event = self.events.create_event(draft).await?;
        log_admin_action(&session.uid, "add_event", event.id.as_deref());
        Ok(event)
    }

    /// Overwrite an existing event through the admin form
    pub async fn update_event(
        &self,
        session: &Session,
        id: &str,
        draft: EventDraft,
    ) -> Result<Event> {
        self.require_admin(session).await?;
        if self.events.get_event(id).await?.is_none() {
            return Err(CampusError::EventNotFound {
                event_id: id.to_string(),
            });
        }
        let event = self.events.update_event(id, draft).await?;
        log_admin_action(&session.uid, "update_event", Some(id));
        Ok(event)
    }

    /// Delete an event by id
    pub async fn delete_event(&self, session: &Session, id: &str) -> Result<()> {
        self.require_admin(session).await?;
        self.events.delete_event(id).await?;
        log_admin_action(&session.uid, "delete_event", Some(id));
        Ok(())
    }
}
