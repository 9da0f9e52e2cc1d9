//! HTTP document store client
//!
//! Client for the managed backend's document API. Collections live under
//! `{base_url}/{collection}`; single documents under
//! `{base_url}/{collection}/{id}`; equality queries are POSTed to
//! `{base_url}/{collection}:query`. Conditional creation uses
//! `If-None-Match: *`, which the backend answers with 412 when the document
//! already exists.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::StoreConfig;
use crate::store::{Document, DocumentStore, FieldFilter};
use crate::utils::errors::{StoreError, StoreResult};

/// Response to an `add` request
#[derive(Debug, Deserialize)]
struct AddResponse {
    id: String,
}

/// Query request body
#[derive(Debug, serde::Serialize)]
struct QueryRequest<'a> {
    filters: &'a [FieldFilter],
}

/// Document store client over the backend's REST API
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: Client,
    base_url: String,
}

impl HttpStore {
    /// Create a new HttpStore from configuration
    pub fn new(config: &StoreConfig) -> StoreResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("campus-events/1.0")
            .build()
            .map_err(|e| StoreError::RequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}", self.base_url, collection)
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{}/{}", self.base_url, collection, id)
    }

    fn map_transport_error(e: reqwest::Error) -> StoreError {
        if e.is_timeout() {
            StoreError::Timeout
        } else if e.is_connect() {
            StoreError::ServiceUnavailable
        } else {
            StoreError::RequestFailed(e.to_string())
        }
    }

    async fn error_from_status(response: reqwest::Response) -> StoreError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        StoreError::RequestFailed(format!("HTTP {}: {}", status, body))
    }
}

#[async_trait]
impl DocumentStore for HttpStore {
    async fn list(&self, collection: &str) -> StoreResult<Vec<Document>> {
        let url = self.collection_url(collection);
        debug!(collection = collection, url = %url, "Listing collection");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        if !response.status().is_success() {
            return Err(Self::error_from_status(response).await);
        }

        response
            .json::<Vec<Document>>()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))
    }

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        let url = self.document_url(collection, id);
        debug!(collection = collection, id = id, "Fetching document");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::error_from_status(response).await);
        }

        let document = response
            .json::<Document>()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;
        Ok(Some(document))
    }

    async fn query_eq(
        &self,
        collection: &str,
        filters: &[FieldFilter],
    ) -> StoreResult<Vec<Document>> {
        let url = format!("{}:query", self.collection_url(collection));
        debug!(collection = collection, filters = filters.len(), "Querying collection");

        let response = self
            .client
            .post(&url)
            .json(&QueryRequest { filters })
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        if !response.status().is_success() {
            return Err(Self::error_from_status(response).await);
        }

        response
            .json::<Vec<Document>>()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))
    }

    async fn add(&self, collection: &str, data: Value) -> StoreResult<String> {
        let url = self.collection_url(collection);
        debug!(collection = collection, "Adding document");

        let response = self
            .client
            .post(&url)
            .json(&data)
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        if !response.status().is_success() {
            return Err(Self::error_from_status(response).await);
        }

        let added = response
            .json::<AddResponse>()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;
        Ok(added.id)
    }

    async fn put(&self, collection: &str, id: &str, data: Value) -> StoreResult<()> {
        let url = self.document_url(collection, id);
        debug!(collection = collection, id = id, "Overwriting document");

        let response = self
            .client
            .put(&url)
            .json(&data)
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        if !response.status().is_success() {
            return Err(Self::error_from_status(response).await);
        }
        Ok(())
    }

    async fn create(&self, collection: &str, id: &str, data: Value) -> StoreResult<()> {
        let url = self.document_url(collection, id);
        debug!(collection = collection, id = id, "Creating document if absent");

        let response = self
            .client
            .put(&url)
            .header(reqwest::header::IF_NONE_MATCH, "*")
            .json(&data)
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        if response.status() == StatusCode::PRECONDITION_FAILED {
            return Err(StoreError::Conflict {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        if !response.status().is_success() {
            return Err(Self::error_from_status(response).await);
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        let url = self.document_url(collection, id);
        debug!(collection = collection, id = id, "Deleting document");

        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        // Deleting an already-absent document is treated as done.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        if !response.status().is_success() {
            return Err(Self::error_from_status(response).await);
        }
        Ok(())
    }
}
