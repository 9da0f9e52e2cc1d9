//! HTTP identity provider client
//!
//! Client for the managed identity service's REST API. Accounts live under
//! `{base_url}/accounts`, sessions under `{base_url}/sessions`. Rejections
//! (bad credentials, duplicate email) come back as 4xx responses with a
//! JSON `message` field, which is passed through to callers untouched.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::IdentityConfig;
use crate::identity::{Account, IdentityProvider};
use crate::utils::errors::{IdentityError, IdentityResult};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CredentialsRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DisplayNameRequest<'a> {
    display_name: &'a str,
}

#[derive(Debug, Deserialize)]
struct RejectionResponse {
    message: String,
}

/// Identity provider client over the service's REST API
#[derive(Debug, Clone)]
pub struct HttpIdentity {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpIdentity {
    /// Create a new HttpIdentity from configuration
    pub fn new(config: &IdentityConfig) -> IdentityResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("campus-events/1.0")
            .build()
            .map_err(|e| IdentityError::RequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn map_transport_error(e: reqwest::Error) -> IdentityError {
        if e.is_timeout() {
            IdentityError::Timeout
        } else if e.is_connect() {
            IdentityError::ServiceUnavailable
        } else {
            IdentityError::RequestFailed(e.to_string())
        }
    }

    /// Turn a non-success response into an error, preserving the
    /// provider's message for client rejections.
    async fn error_from_response(response: reqwest::Response) -> IdentityError {
        let status = response.status();
        if status.is_client_error() {
            return match response.json::<RejectionResponse>().await {
                Ok(rejection) => IdentityError::Rejected(rejection.message),
                Err(_) => IdentityError::Rejected(format!("Request rejected: HTTP {}", status)),
            };
        }
        let body = response.text().await.unwrap_or_default();
        IdentityError::RequestFailed(format!("HTTP {}: {}", status, body))
    }

    async fn account_from_response(response: reqwest::Response) -> IdentityResult<Account> {
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        response
            .json::<Account>()
            .await
            .map_err(|e| IdentityError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentity {
    async fn create_account(&self, email: &str, password: &str) -> IdentityResult<Account> {
        debug!(email = email, "Creating account");
        let response = self
            .client
            .post(self.url("accounts"))
            .bearer_auth(&self.api_key)
            .json(&CredentialsRequest { email, password })
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        Self::account_from_response(response).await
    }

    async fn sign_in(&self, email: &str, password: &str) -> IdentityResult<Account> {
        debug!(email = email, "Signing in");
        let response = self
            .client
            .post(self.url("sessions"))
            .bearer_auth(&self.api_key)
            .json(&CredentialsRequest { email, password })
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        Self::account_from_response(response).await
    }

    async fn sign_out(&self, uid: &str) -> IdentityResult<()> {
        debug!(uid = uid, "Signing out");
        let response = self
            .client
            .delete(self.url(&format!("sessions/{}", uid)))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        Ok(())
    }

    async fn current_account(&self) -> IdentityResult<Option<Account>> {
        let response = self
            .client
            .get(self.url("sessions/current"))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        let account = response
            .json::<Account>()
            .await
            .map_err(|e| IdentityError::InvalidResponse(e.to_string()))?;
        Ok(Some(account))
    }

    async fn update_display_name(&self, uid: &str, name: &str) -> IdentityResult<()> {
        debug!(uid = uid, "Updating display name");
        let response = self
            .client
            .patch(self.url(&format!("accounts/{}", uid)))
            .bearer_auth(&self.api_key)
            .json(&DisplayNameRequest { display_name: name })
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        Ok(())
    }
}
