//! Services module
//!
//! This module contains business logic services

pub mod admin;
pub mod auth;
pub mod events;
pub mod registration;
pub mod users;

// Re-export commonly used services
pub use admin::{filter_registrations, AdminOverview, AdminService, RegistrationFilter};
pub use auth::{enrollment_number_is_valid, AuthService};
pub use events::EventService;
pub use registration::RegistrationService;
pub use users::UserDirectory;

use std::sync::Arc;

use crate::config::settings::Settings;
use crate::identity::{HttpIdentity, IdentityProvider};
use crate::store::{DocumentStore, HttpStore};
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub auth_service: AuthService,
    pub event_service: EventService,
    pub user_directory: UserDirectory,
    pub registration_service: RegistrationService,
    pub admin_service: AdminService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory over the given backends
    pub fn new(
        store: Arc<dyn DocumentStore>,
        identity: Arc<dyn IdentityProvider>,
        settings: Settings,
    ) -> Self {
        let event_service = EventService::new(store.clone());
        let user_directory = UserDirectory::new(store.clone());
        let registration_service = RegistrationService::new(store);
        let auth_service = AuthService::new(identity, user_directory.clone());
        let admin_service = AdminService::new(
            event_service.clone(),
            user_directory.clone(),
            registration_service.clone(),
            settings.features,
        );

        Self {
            auth_service,
            event_service,
            user_directory,
            registration_service,
            admin_service,
        }
    }

    /// Create a ServiceFactory wired to the managed backends from settings
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let store: Arc<dyn DocumentStore> = Arc::new(HttpStore::new(&settings.store)?);
        let identity: Arc<dyn IdentityProvider> = Arc::new(HttpIdentity::new(&settings.identity)?);
        Ok(Self::new(store, identity, settings.clone()))
    }
}
