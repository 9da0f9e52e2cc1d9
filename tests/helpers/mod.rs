//! Shared test infrastructure
//!
//! Builds the service stack over the in-memory backends and provides
//! fixture helpers for seeding accounts, profiles and events.

use std::sync::Arc;

use serde_json::json;

use campus_events::config::Settings;
use campus_events::identity::MemoryIdentity;
use campus_events::models::{Event, EventDraft, SignUpRequest};
use campus_events::services::ServiceFactory;
use campus_events::store::{collections, MemoryStore};
use campus_events::{Session, SessionHandle};

/// Test context wiring the services to in-process backends
pub struct TestContext {
    pub store: MemoryStore,
    pub identity: MemoryIdentity,
    pub services: ServiceFactory,
}

impl TestContext {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let identity = MemoryIdentity::new();
        let services = ServiceFactory::new(
            Arc::new(store.clone()),
            Arc::new(identity.clone()),
            Settings::default(),
        );
        Self {
            store,
            identity,
            services,
        }
    }

    /// Sign up a regular user and return the published session
    pub async fn sign_up_user(&self, email: &str, handle: &SessionHandle) -> Session {
        self.services
            .auth_service
            .sign_up(
                SignUpRequest {
                    email: email.to_string(),
                    password: "secret".to_string(),
                    name: "Test Student".to_string(),
                    enrollment_number: "A12345678901".to_string(),
                },
                handle,
            )
            .await
            .expect("sign-up should succeed")
    }

    /// Seed an admin profile directly in the store, the only place an
    /// admin role can come from
    pub fn seed_admin(&self, uid: &str, email: &str) -> Session {
        self.store.seed(
            collections::USERS,
            uid,
            json!({
                "uid": uid,
                "email": email,
                "name": "Admin",
                "enrollmentNumber": "A00000000000",
                "role": "admin",
            }),
        );
        Session {
            uid: uid.to_string(),
            email: email.to_string(),
            display_name: "Admin".to_string(),
            role: Some(campus_events::models::Role::Admin),
        }
    }

    /// Create an event through the event service
    pub async fn seed_event(&self, title: &str) -> Event {
        self.services
            .event_service
            .create_event(EventDraft {
                title: title.to_string(),
                date: "2025-04-01".to_string(),
                location: "Main Hall".to_string(),
                description: "Seeded test event".to_string(),
            })
            .await
            .expect("event creation should succeed")
    }
}
