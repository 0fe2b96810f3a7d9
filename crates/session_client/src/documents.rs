use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use shared::domain::DocumentSummary;
use shared::protocol::{sign_batch_route, SignBatchRequest, SignBatchResponse, SignedUrlResult};
use thiserror::Error;
use tracing::debug;

use crate::auth::AuthClient;

const LIST_PAGE_LIMIT: u32 = 100;

#[derive(Debug, Clone)]
pub struct DocumentsConfig {
    /// Base URL of the storage provider, without a trailing slash.
    pub storage_url: String,
    /// Base URL of the signed-URL gateway.
    pub signer_url: String,
    pub bucket: String,
}

#[derive(Debug, Error)]
pub enum DocumentsError {
    #[error("no active session")]
    NotSignedIn,
    #[error("storage request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Folder entry as the storage provider reports it.
#[derive(Debug, Deserialize)]
struct StorageObject {
    name: String,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    metadata: Option<StorageObjectMetadata>,
}

#[derive(Debug, Default, Deserialize)]
struct StorageObjectMetadata {
    #[serde(default)]
    size: u64,
}

/// Reads a user's document folder and requests download links for entries.
///
/// Listing talks to the storage provider with the user's access token;
/// signing goes through the gateway, which holds the service credential.
pub struct DocumentsClient {
    http: reqwest::Client,
    config: DocumentsConfig,
    auth: Arc<AuthClient>,
}

impl DocumentsClient {
    pub fn new(config: DocumentsConfig, auth: Arc<AuthClient>) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            auth,
        }
    }

    pub async fn list_documents(
        &self,
        prefix: &str,
    ) -> Result<Vec<DocumentSummary>, DocumentsError> {
        let token = self
            .auth
            .access_token()
            .await
            .ok_or(DocumentsError::NotSignedIn)?;
        let url = format!(
            "{}/storage/v1/object/list/{}",
            self.config.storage_url, self.config.bucket
        );
        let objects: Vec<StorageObject> = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(&serde_json::json!({
                "prefix": prefix,
                "limit": LIST_PAGE_LIMIT,
                "sortBy": { "column": "name", "order": "asc" },
            }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!(count = objects.len(), prefix, "documents: listed folder");
        Ok(objects
            .into_iter()
            .map(|object| summarize(prefix, object))
            .collect())
    }

    /// Requests short-lived links from the gateway for the given paths.
    ///
    /// Per-path failures come back inside the results rather than failing
    /// the whole batch.
    pub async fn sign_documents(
        &self,
        paths: Vec<String>,
        expires_in: Option<u64>,
    ) -> Result<Vec<SignedUrlResult>, DocumentsError> {
        let token = self
            .auth
            .access_token()
            .await
            .ok_or(DocumentsError::NotSignedIn)?;
        let request = SignBatchRequest {
            paths,
            bucket: Some(self.config.bucket.clone()),
            expires_in,
        };
        let url = format!("{}{}", self.config.signer_url, sign_batch_route());
        let response: SignBatchResponse = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!(count = response.results.len(), "documents: signed batch");
        Ok(response.results)
    }
}

/// Joins a folder entry back into a full storage path.
fn summarize(prefix: &str, object: StorageObject) -> DocumentSummary {
    let path = if prefix.is_empty() {
        object.name.clone()
    } else {
        format!("{}/{}", prefix.trim_end_matches('/'), object.name)
    };
    DocumentSummary {
        path,
        name: object.name,
        size_bytes: object.metadata.map(|m| m.size).unwrap_or(0),
        updated_at: object.updated_at,
    }
}

#[cfg(test)]
#[path = "tests/documents_tests.rs"]
mod tests;
