//! Event registration model

use serde::{Deserialize, Serialize};

/// How a user attends an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendeeRole {
    Participant,
    Audience,
}

impl AttendeeRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendeeRole::Participant => "Participant",
            AttendeeRole::Audience => "Audience",
        }
    }
}

impl std::fmt::Display for AttendeeRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registration as stored in the `registrations` collection.
///
/// `event_id` holds the event's store identifier. Registrations are written
/// once and never mutated; their document id is derived from the
/// `(event_id, user_email)` pair so the store itself rejects duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    #[serde(skip)]
    pub id: Option<String>,
    pub event_id: String,
    pub user_email: String,
    #[serde(default)]
    pub user_name: String,
    pub role: AttendeeRole,
    #[serde(default)]
    pub course: String,
    #[serde(default)]
    pub year: String,
    /// Creation time, epoch milliseconds
    pub timestamp: i64,
}

impl Registration {
    /// Deterministic document id for a `(event, email)` pair.
    ///
    /// Two submissions for the same pair always target the same id, so a
    /// conditional create turns the uniqueness rule into a store-level
    /// constraint instead of a racy read-then-write.
    pub fn document_key(event_id: &str, user_email: &str) -> String {
        let email: String = user_email
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
            .collect();
        format!("{}--{}", event_id, email)
    }
}

/// Registration form payload filled in by the user
#[derive(Debug, Clone)]
pub struct RegistrationForm {
    pub role: AttendeeRole,
    pub course: String,
    pub year: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attendee_role_wire_format() {
        assert_eq!(serde_json::to_value(AttendeeRole::Participant).unwrap(), "Participant");
        assert_eq!(serde_json::to_value(AttendeeRole::Audience).unwrap(), "Audience");
    }

    #[test]
    fn test_document_key_is_deterministic_and_case_insensitive() {
        let a = Registration::document_key("ev1", "A@X.com");
        let b = Registration::document_key("ev1", "a@x.com ");
        assert_eq!(a, b);
        assert_eq!(a, "ev1--a-x-com");

        let other_event = Registration::document_key("ev2", "a@x.com");
        assert_ne!(a, other_event);
    }

    #[test]
    fn test_wire_field_names() {
        let reg = Registration {
            id: None,
            event_id: "ev1".to_string(),
            user_email: "a@x.com".to_string(),
            user_name: "Asha".to_string(),
            role: AttendeeRole::Audience,
            course: "B.Tech CSE".to_string(),
            year: "2nd Year".to_string(),
            timestamp: 1_700_000_000_000,
        };
        let value = serde_json::to_value(&reg).unwrap();
        assert_eq!(value["eventId"], "ev1");
        assert_eq!(value["userEmail"], "a@x.com");
        assert_eq!(value["userName"], "Asha");
        assert_eq!(value["role"], "Audience");
        assert!(value.get("id").is_none());
    }
}
