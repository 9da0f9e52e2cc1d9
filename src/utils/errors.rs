//! Error handling for campus-events
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy. Store and identity
//! failures are kept distinct from "found nothing" results: lookups return
//! `Ok(None)` for absence and `Err` for transport problems.

use thiserror::Error;

/// Main error type for the campus-events application
#[derive(Error, Debug)]
pub enum CampusError {
    #[error("Document store error: {0}")]
    Store(#[from] StoreError),

    #[error("Identity provider error: {0}")]
    Identity(#[from] IdentityError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: String },

    #[error("Already registered for event: {event_id}")]
    AlreadyRegistered { event_id: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Document store specific errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store request failed: {0}")]
    RequestFailed(String),

    #[error("Store request timed out")]
    Timeout,

    #[error("Document already exists: {collection}/{id}")]
    Conflict { collection: String, id: String },

    #[error("Invalid store response: {0}")]
    InvalidResponse(String),

    #[error("Store unavailable")]
    ServiceUnavailable,
}

/// Identity provider specific errors
#[derive(Error, Debug)]
pub enum IdentityError {
    /// The provider rejected the operation; carries its message verbatim.
    #[error("{0}")]
    Rejected(String),

    #[error("Identity request failed: {0}")]
    RequestFailed(String),

    #[error("Identity request timed out")]
    Timeout,

    #[error("Invalid identity response: {0}")]
    InvalidResponse(String),

    #[error("Identity provider unavailable")]
    ServiceUnavailable,
}

/// Result type alias for campus-events operations
pub type Result<T> = std::result::Result<T, CampusError>;

/// Result type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result type alias for identity operations
pub type IdentityResult<T> = std::result::Result<T, IdentityError>;

impl CampusError {
    /// Check if the error is recoverable by retrying the same call
    pub fn is_recoverable(&self) -> bool {
        match self {
            CampusError::Store(e) => e.is_recoverable(),
            CampusError::Identity(e) => matches!(
                e,
                IdentityError::Timeout
                    | IdentityError::ServiceUnavailable
                    | IdentityError::RequestFailed(_)
            ),
            CampusError::Config(_) => false,
            CampusError::PermissionDenied(_) => false,
            CampusError::EventNotFound { .. } => false,
            CampusError::AlreadyRegistered { .. } => false,
            CampusError::Serialization(_) => false,
            CampusError::UrlParse(_) => false,
            CampusError::InvalidInput(_) => false,
        }
    }

    /// Human-readable message suitable for surfacing to an end user
    pub fn user_message(&self) -> String {
        match self {
            CampusError::Identity(IdentityError::Rejected(msg)) => msg.clone(),
            CampusError::AlreadyRegistered { .. } => {
                "You're already registered for this event".to_string()
            }
            CampusError::InvalidInput(msg) => msg.clone(),
            CampusError::PermissionDenied(_) => "Access denied".to_string(),
            _ => "Something went wrong, please try again".to_string(),
        }
    }
}

impl StoreError {
    /// Check if the error is recoverable by retrying the same call
    pub fn is_recoverable(&self) -> bool {
        match self {
            StoreError::RequestFailed(_) => true,
            StoreError::Timeout => true,
            StoreError::Conflict { .. } => false,
            StoreError::InvalidResponse(_) => false,
            StoreError::ServiceUnavailable => true,
        }
    }
}
