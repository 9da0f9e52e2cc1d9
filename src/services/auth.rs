//! Authentication service implementation
//!
//! Sign-up, sign-in and sign-out against the external identity provider,
//! plus the profile bootstrap in the user directory. Sign-in is a single
//! sequential operation: authenticate, resolve the role, then publish the
//! session, so observers never see a logged-in session whose role is
//! still in flight.

use std::sync::Arc;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::identity::IdentityProvider;
use crate::models::user::{Role, SignUpRequest, UserProfile};
use crate::services::users::UserDirectory;
use crate::state::session::{Session, SessionHandle};
use crate::utils::errors::{CampusError, Result};
use crate::utils::logging::log_auth_event;

/// Enrollment numbers are one uppercase "A" followed by exactly 11 digits.
fn enrollment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^A\d{11}$").expect("enrollment pattern is valid"))
}

/// Check an enrollment number against the campus format
pub fn enrollment_number_is_valid(input: &str) -> bool {
    enrollment_pattern().is_match(input.trim())
}

/// Authentication service for account and session management
#[derive(Clone)]
pub struct AuthService {
    identity: Arc<dyn IdentityProvider>,
    users: UserDirectory,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(identity: Arc<dyn IdentityProvider>, users: UserDirectory) -> Self {
        Self { identity, users }
    }

    /// Create an account and its profile record, then open a session.
    ///
    /// The enrollment number is validated before any network call; a
    /// mismatch never reaches the provider. The profile is written with
    /// role `user` — sign-up cannot grant anything higher.
    pub async fn sign_up(&self, request: SignUpRequest, handle: &SessionHandle) -> Result<Session> {
        let email = request.email.trim().to_string();
        let enrollment_number = request.enrollment_number.trim().to_string();

        if !enrollment_number_is_valid(&enrollment_number) {
            debug!(email = %email, "Enrollment number failed format check");
            log_auth_event(&email, "sign_up", false, Some("invalid enrollment number"));
            return Err(CampusError::InvalidInput(
                "Invalid enrollment number format.".to_string(),
            ));
        }

        let account = self
            .identity
            .create_account(&email, request.password.trim())
            .await?;

        if let Err(e) = self
            .identity
            .update_display_name(&account.uid, &request.name)
            .await
        {
            // The account exists either way; a failed name update is not
            // worth aborting sign-up over.
            warn!(uid = %account.uid, error = %e, "Display name update failed");
        }

        let profile = UserProfile {
            uid: account.uid.clone(),
            email: account.email.clone(),
            name: request.name.clone(),
            enrollment_number,
            role: Role::User,
        };
        self.users.create_profile(&profile).await?;

        let session = Session {
            uid: account.uid,
            email: account.email,
            display_name: request.name,
            role: Some(Role::User),
        };
        handle.set(session.clone());
        log_auth_event(&session.email, "sign_up", true, None);
        Ok(session)
    }

    /// Check credentials, resolve the role, then publish the session
    pub async fn sign_in(&self, email: &str, password: &str, handle: &SessionHandle) -> Result<Session> {
        let account = match self.identity.sign_in(email.trim(), password.trim()).await {
            Ok(account) => account,
            Err(e) => {
                log_auth_event(email.trim(), "sign_in", false, None);
                return Err(e.into());
            }
        };

        // Role resolution completes before the session becomes visible.
        let role = self.users.get_role(&account.uid).await?;

        let session = Session {
            uid: account.uid,
            email: account.email,
            display_name: account.display_name,
            role,
        };
        handle.set(session.clone());
        info!(uid = %session.uid, role = ?session.role, "User signed in");
        Ok(session)
    }

    /// Close the provider session, then clear the local one.
    ///
    /// Local state is only dropped after the provider confirms, so a
    /// failed sign-out leaves the handle untouched for a retry.
    pub async fn sign_out(&self, handle: &SessionHandle) -> Result<()> {
        let Some(session) = handle.current() else {
            return Ok(());
        };

        self.identity.sign_out(&session.uid).await?;
        handle.clear();
        info!(uid = %session.uid, "User signed out");
        Ok(())
    }

    /// Rebuild the session from the provider's persisted state, if any.
    ///
    /// Used at startup: when the provider still holds an open session, the
    /// role is resolved and the session published exactly as at sign-in.
    pub async fn restore_session(&self, handle: &SessionHandle) -> Result<Option<Session>> {
        let Some(account) = self.identity.current_account().await? else {
            return Ok(None);
        };

        let role = self.users.get_role(&account.uid).await?;
        let session = Session {
            uid: account.uid,
            email: account.email,
            display_name: account.display_name,
            role,
        };
        handle.set(session.clone());
        debug!(uid = %session.uid, role = ?session.role, "Session restored");
        Ok(Some(session))
    }

    /// Re-resolve the current session's role from the directory and
    /// publish the refreshed session
    pub async fn refresh_role(&self, handle: &SessionHandle) -> Result<Option<Role>> {
        let Some(mut session) = handle.current() else {
            return Ok(None);
        };

        let role = self.users.get_role(&session.uid).await?;
        session.role = role;
        handle.set(session);
        Ok(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::MemoryIdentity;
    use crate::store::{collections, MemoryStore};
    use assert_matches::assert_matches;
    use proptest::prelude::*;
    use serde_json::json;

    fn auth_over(store: &MemoryStore, identity: &MemoryIdentity) -> AuthService {
        AuthService::new(
            Arc::new(identity.clone()),
            UserDirectory::new(Arc::new(store.clone())),
        )
    }

    fn sign_up_request(enrollment_number: &str) -> SignUpRequest {
        SignUpRequest {
            email: "a@x.com".to_string(),
            password: "secret".to_string(),
            name: "Asha".to_string(),
            enrollment_number: enrollment_number.to_string(),
        }
    }

    #[test]
    fn test_enrollment_format_examples() {
        assert!(enrollment_number_is_valid("A12345678901"));
        assert!(enrollment_number_is_valid("  A12345678901  "));
        assert!(!enrollment_number_is_valid("a12345678901"));
        assert!(!enrollment_number_is_valid("A1234567890"));
        assert!(!enrollment_number_is_valid("A123456789012"));
        assert!(!enrollment_number_is_valid("B12345678901"));
        assert!(!enrollment_number_is_valid("A1234567890x"));
        assert!(!enrollment_number_is_valid(""));
    }

    proptest! {
        #[test]
        fn prop_valid_iff_a_plus_eleven_digits(input in "[Aa]?[0-9]{9,13}") {
            let expected = input.len() == 12
                && input.starts_with('A')
                && input[1..].bytes().all(|b| b.is_ascii_digit());
            prop_assert_eq!(enrollment_number_is_valid(&input), expected);
        }
    }

    #[tokio::test]
    async fn test_invalid_enrollment_makes_no_provider_call() {
        let store = MemoryStore::new();
        let identity = MemoryIdentity::new();
        let auth = auth_over(&store, &identity);
        let handle = SessionHandle::new();

        let err = auth
            .sign_up(sign_up_request("A1234567890"), &handle)
            .await
            .unwrap_err();
        assert_matches!(err, CampusError::InvalidInput(_));
        assert_eq!(err.user_message(), "Invalid enrollment number format.");

        assert_eq!(identity.account_count(), 0);
        assert_eq!(store.count(collections::USERS), 0);
        assert!(!handle.is_logged_in());
    }

    #[tokio::test]
    async fn test_sign_up_writes_profile_with_user_role() {
        let store = MemoryStore::new();
        let identity = MemoryIdentity::new();
        let auth = auth_over(&store, &identity);
        let handle = SessionHandle::new();

        let session = auth
            .sign_up(sign_up_request("A12345678901"), &handle)
            .await
            .unwrap();
        assert_eq!(session.role, Some(Role::User));
        assert!(handle.is_logged_in());

        let directory = UserDirectory::new(Arc::new(store.clone()));
        let profile = directory.get_profile(&session.uid).await.unwrap().unwrap();
        assert_eq!(profile.role, Role::User);
        assert_eq!(profile.enrollment_number, "A12345678901");
        assert_eq!(profile.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_sign_in_publishes_session_with_resolved_role() {
        let store = MemoryStore::new();
        let identity = MemoryIdentity::new();
        let auth = auth_over(&store, &identity);
        let handle = SessionHandle::new();

        let created = auth
            .sign_up(sign_up_request("A12345678901"), &handle)
            .await
            .unwrap();
        auth.sign_out(&handle).await.unwrap();

        // Promote out-of-band, directly in the store.
        store.seed(
            collections::USERS,
            &created.uid,
            json!({"uid": created.uid, "email": "a@x.com", "role": "admin"}),
        );

        let session = auth.sign_in("a@x.com", "secret", &handle).await.unwrap();
        assert_eq!(session.role, Some(Role::Admin));
        // The published session already carries the role.
        assert_eq!(handle.current().unwrap().role, Some(Role::Admin));
    }

    #[tokio::test]
    async fn test_sign_in_rejection_carries_provider_message() {
        let store = MemoryStore::new();
        let identity = MemoryIdentity::new();
        let auth = auth_over(&store, &identity);
        let handle = SessionHandle::new();

        auth.sign_up(sign_up_request("A12345678901"), &handle)
            .await
            .unwrap();
        auth.sign_out(&handle).await.unwrap();

        let err = auth
            .sign_in("a@x.com", "wrong", &handle)
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "The supplied auth credential is incorrect.");
        assert!(!handle.is_logged_in());
    }

    #[tokio::test]
    async fn test_restore_session_resolves_role_first() {
        let store = MemoryStore::new();
        let identity = MemoryIdentity::new();
        let auth = auth_over(&store, &identity);
        let handle = SessionHandle::new();

        let created = auth
            .sign_up(sign_up_request("A12345678901"), &handle)
            .await
            .unwrap();

        // A fresh handle, as after an app restart. The provider still
        // holds the session.
        let fresh = SessionHandle::new();
        let restored = auth.restore_session(&fresh).await.unwrap().unwrap();
        assert_eq!(restored.uid, created.uid);
        assert_eq!(fresh.current().unwrap().role, Some(Role::User));

        auth.sign_out(&fresh).await.unwrap();
        assert!(auth.restore_session(&fresh).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failed_sign_out_leaves_session_in_place() {
        let store = MemoryStore::new();
        let identity = MemoryIdentity::new();
        let auth = auth_over(&store, &identity);
        let handle = SessionHandle::new();

        auth.sign_up(sign_up_request("A12345678901"), &handle)
            .await
            .unwrap();

        identity.set_unavailable(true);
        assert_matches!(auth.sign_out(&handle).await, Err(_));
        assert!(handle.is_logged_in());

        identity.set_unavailable(false);
        auth.sign_out(&handle).await.unwrap();
        assert!(!handle.is_logged_in());
    }
}
