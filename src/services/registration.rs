//! Registration submission service
//!
//! Registrations are keyed by the event's store identifier and written at
//! a deterministic document id derived from `(event_id, user_email)`, so
//! the uniqueness rule is a store-level constraint: two concurrent
//! submissions for the same pair race on the same id and exactly one
//! create wins. A read-only pre-check still supplies the friendly
//! "already registered" rejection without consuming a write.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::models::event::Event;
use crate::models::registration::{Registration, RegistrationForm};
use crate::state::session::Session;
use crate::store::{collections, DocumentStore, FieldFilter};
use crate::utils::errors::{CampusError, Result, StoreError};

/// Service for creating and listing event registrations
#[derive(Clone)]
pub struct RegistrationService {
    store: Arc<dyn DocumentStore>,
}

impl RegistrationService {
    /// Create a new RegistrationService instance
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Register the signed-in user for an event
    pub async fn register(
        &self,
        session: &Session,
        event: &Event,
        form: RegistrationForm,
    ) -> Result<Registration> {
        if form.course.trim().is_empty() || form.year.trim().is_empty() {
            return Err(CampusError::InvalidInput(
                "Please fill in all details".to_string(),
            ));
        }

        let event_id = event.id.as_deref().ok_or_else(|| {
            CampusError::InvalidInput("Event has not been saved yet".to_string())
        })?;

        // Friendly rejection path; the create below is what actually
        // enforces uniqueness.
        let existing = self
            .store
            .query_eq(
                collections::REGISTRATIONS,
                &[
                    FieldFilter::new("eventId", event_id),
                    FieldFilter::new("userEmail", session.email.as_str()),
                ],
            )
            .await?;
        if !existing.is_empty() {
            debug!(event_id = event_id, email = %session.email, "Duplicate registration rejected by pre-check");
            return Err(CampusError::AlreadyRegistered {
                event_id: event_id.to_string(),
            });
        }

        let registration = Registration {
            id: None,
            event_id: event_id.to_string(),
            user_email: session.email.clone(),
            user_name: session.display_name.clone(),
            role: form.role,
            course: form.course,
            year: form.year,
            timestamp: Utc::now().timestamp_millis(),
        };

        let key = Registration::document_key(event_id, &session.email);
        let data = serde_json::to_value(&registration)?;
        match self
            .store
            .create(collections::REGISTRATIONS, &key, data)
            .await
        {
            Ok(()) => {
                info!(event_id = event_id, email = %session.email, "Registration created");
                Ok(Registration {
                    id: Some(key),
                    ..registration
                })
            }
            Err(StoreError::Conflict { .. }) => {
                // Lost the race against a concurrent submission.
                warn!(event_id = event_id, email = %session.email, "Registration lost create race");
                Err(CampusError::AlreadyRegistered {
                    event_id: event_id.to_string(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// All registrations belonging to one user
    pub async fn list_for_user(&self, email: &str) -> Result<Vec<Registration>> {
        let documents = self
            .store
            .query_eq(
                collections::REGISTRATIONS,
                &[FieldFilter::new("userEmail", email)],
            )
            .await?;
        self.decode(documents)
    }

    /// Every registration in the collection
    pub async fn list_all(&self) -> Result<Vec<Registration>> {
        let documents = self.store.list(collections::REGISTRATIONS).await?;
        self.decode(documents)
    }

    fn decode(&self, documents: Vec<crate::store::Document>) -> Result<Vec<Registration>> {
        let mut registrations = Vec::with_capacity(documents.len());
        for document in documents {
            match serde_json::from_value::<Registration>(document.data) {
                Ok(mut registration) => {
                    registration.id = Some(document.id);
                    registrations.push(registration);
                }
                Err(e) => {
                    warn!(registration_id = %document.id, error = %e, "Skipping undecodable registration");
                }
            }
        }
        Ok(registrations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::registration::AttendeeRole;
    use crate::models::user::Role;
    use crate::store::MemoryStore;
    use assert_matches::assert_matches;

    fn service_over(store: &MemoryStore) -> RegistrationService {
        RegistrationService::new(Arc::new(store.clone()))
    }

    fn session(email: &str) -> Session {
        Session {
            uid: format!("uid-{email}"),
            email: email.to_string(),
            display_name: "Asha".to_string(),
            role: Some(Role::User),
        }
    }

    fn saved_event(id: &str, title: &str) -> Event {
        Event {
            id: Some(id.to_string()),
            title: title.to_string(),
            date: "2025-04-01".to_string(),
            location: "Main Hall".to_string(),
            description: String::new(),
        }
    }

    fn form() -> RegistrationForm {
        RegistrationForm {
            role: AttendeeRole::Participant,
            course: "B.Tech CSE".to_string(),
            year: "2nd Year".to_string(),
        }
    }

    #[tokio::test]
    async fn test_blank_form_fields_rejected_before_any_store_call() {
        let store = MemoryStore::new();
        let service = service_over(&store);
        store.fail_everything(true); // would error if the store were touched

        let mut blank = form();
        blank.course = " ".to_string();
        let err = service
            .register(&session("a@x.com"), &saved_event("ev1", "Spring Fest"), blank)
            .await
            .unwrap_err();
        assert_matches!(err, CampusError::InvalidInput(_));
        assert_eq!(err.user_message(), "Please fill in all details");
    }

    #[tokio::test]
    async fn test_unsaved_event_rejected() {
        let store = MemoryStore::new();
        let service = service_over(&store);

        let unsaved = Event {
            id: None,
            ..saved_event("ignored", "Spring Fest")
        };
        assert_matches!(
            service.register(&session("a@x.com"), &unsaved, form()).await,
            Err(CampusError::InvalidInput(_))
        );
        assert_eq!(store.count(collections::REGISTRATIONS), 0);
    }

    #[tokio::test]
    async fn test_duplicate_pair_rejected_others_accepted() {
        let store = MemoryStore::new();
        let service = service_over(&store);
        let spring = saved_event("ev1", "Spring Fest");
        let autumn = saved_event("ev2", "Autumn Fest");

        service
            .register(&session("a@x.com"), &spring, form())
            .await
            .unwrap();
        assert_eq!(store.count(collections::REGISTRATIONS), 1);

        let err = service
            .register(&session("a@x.com"), &spring, form())
            .await
            .unwrap_err();
        assert_matches!(err, CampusError::AlreadyRegistered { .. });
        assert_eq!(store.count(collections::REGISTRATIONS), 1);

        // Different email, same event.
        service
            .register(&session("b@x.com"), &spring, form())
            .await
            .unwrap();
        assert_eq!(store.count(collections::REGISTRATIONS), 2);

        // Same email, different event.
        service
            .register(&session("a@x.com"), &autumn, form())
            .await
            .unwrap();
        assert_eq!(store.count(collections::REGISTRATIONS), 3);
    }

    #[tokio::test]
    async fn test_concurrent_duplicates_yield_single_registration() {
        let store = MemoryStore::new();
        let service = service_over(&store);
        let event = saved_event("ev1", "Spring Fest");
        let user = session("a@x.com");

        // Both submissions pass the pre-check before either create runs;
        // the deterministic document id makes the store arbitrate.
        let (first, second) = tokio::join!(
            service.register(&user, &event, form()),
            service.register(&user, &event, form()),
        );

        assert_eq!(store.count(collections::REGISTRATIONS), 1);
        assert!(first.is_ok() || second.is_ok());
        assert!(first.is_err() || second.is_err());
    }

    #[tokio::test]
    async fn test_list_for_user_filters_by_email() {
        let store = MemoryStore::new();
        let service = service_over(&store);
        let spring = saved_event("ev1", "Spring Fest");

        service.register(&session("a@x.com"), &spring, form()).await.unwrap();
        service.register(&session("b@x.com"), &spring, form()).await.unwrap();

        let mine = service.list_for_user("a@x.com").await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].user_email, "a@x.com");
        assert_eq!(mine[0].event_id, "ev1");
        assert_eq!(mine[0].role, AttendeeRole::Participant);
    }
}
