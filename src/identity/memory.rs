//! In-memory identity provider
//!
//! A process-local [`IdentityProvider`] for tests. Accounts are held in a
//! map keyed by email; rejection messages mirror what a managed provider
//! would return.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::identity::{Account, IdentityProvider};
use crate::utils::errors::{IdentityError, IdentityResult};

#[derive(Debug, Clone)]
struct StoredAccount {
    password: String,
    account: Account,
}

/// In-memory identity provider for tests
#[derive(Debug, Clone, Default)]
pub struct MemoryIdentity {
    accounts: Arc<Mutex<HashMap<String, StoredAccount>>>,
    current: Arc<Mutex<Option<Account>>>,
    next_uid: Arc<AtomicU64>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `ServiceUnavailable`
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of accounts held by the provider
    pub fn account_count(&self) -> usize {
        self.accounts.lock().unwrap().len()
    }

    fn check_available(&self) -> IdentityResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(IdentityError::ServiceUnavailable);
        }
        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentity {
    async fn create_account(&self, email: &str, password: &str) -> IdentityResult<Account> {
        self.check_available()?;
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(email) {
            return Err(IdentityError::Rejected(
                "The email address is already in use by another account.".to_string(),
            ));
        }

        let uid = format!("uid-{}", self.next_uid.fetch_add(1, Ordering::SeqCst) + 1);
        let account = Account {
            uid,
            email: email.to_string(),
            display_name: String::new(),
        };
        accounts.insert(
            email.to_string(),
            StoredAccount {
                password: password.to_string(),
                account: account.clone(),
            },
        );
        *self.current.lock().unwrap() = Some(account.clone());
        Ok(account)
    }

    async fn sign_in(&self, email: &str, password: &str) -> IdentityResult<Account> {
        self.check_available()?;
        let accounts = self.accounts.lock().unwrap();
        match accounts.get(email) {
            Some(stored) if stored.password == password => {
                let account = stored.account.clone();
                *self.current.lock().unwrap() = Some(account.clone());
                Ok(account)
            }
            _ => Err(IdentityError::Rejected(
                "The supplied auth credential is incorrect.".to_string(),
            )),
        }
    }

    async fn sign_out(&self, uid: &str) -> IdentityResult<()> {
        self.check_available()?;
        let mut current = self.current.lock().unwrap();
        if current.as_ref().is_some_and(|a| a.uid == uid) {
            *current = None;
        }
        Ok(())
    }

    async fn current_account(&self) -> IdentityResult<Option<Account>> {
        self.check_available()?;
        Ok(self.current.lock().unwrap().clone())
    }

    async fn update_display_name(&self, uid: &str, name: &str) -> IdentityResult<()> {
        self.check_available()?;
        let mut accounts = self.accounts.lock().unwrap();
        let stored = accounts
            .values_mut()
            .find(|stored| stored.account.uid == uid)
            .ok_or_else(|| IdentityError::Rejected("No such account.".to_string()))?;
        stored.account.display_name = name.to_string();

        let mut current = self.current.lock().unwrap();
        if current.as_ref().is_some_and(|a| a.uid == uid) {
            *current = Some(stored.account.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let identity = MemoryIdentity::new();
        identity.create_account("a@x.com", "pw").await.unwrap();

        let err = identity.create_account("a@x.com", "pw2").await.unwrap_err();
        assert_matches!(err, IdentityError::Rejected(_));
        assert_eq!(identity.account_count(), 1);
    }

    #[tokio::test]
    async fn test_sign_in_and_out() {
        let identity = MemoryIdentity::new();
        let account = identity.create_account("a@x.com", "pw").await.unwrap();
        identity.sign_out(&account.uid).await.unwrap();
        assert!(identity.current_account().await.unwrap().is_none());

        assert_matches!(
            identity.sign_in("a@x.com", "wrong").await,
            Err(IdentityError::Rejected(_))
        );

        let signed_in = identity.sign_in("a@x.com", "pw").await.unwrap();
        assert_eq!(signed_in.uid, account.uid);
        assert!(identity.current_account().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_display_name_update_visible_on_current_account() {
        let identity = MemoryIdentity::new();
        let account = identity.create_account("a@x.com", "pw").await.unwrap();
        identity.update_display_name(&account.uid, "Asha").await.unwrap();

        let current = identity.current_account().await.unwrap().unwrap();
        assert_eq!(current.display_name, "Asha");
    }
}
