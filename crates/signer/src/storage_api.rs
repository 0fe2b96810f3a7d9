use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;
use url::Url;

/// Issues time-limited download URLs for objects in a bucket.
///
/// The HTTP implementation talks to the storage provider with the service
/// credential; tests swap in a mock.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn create_signed_url(
        &self,
        bucket: &str,
        path: &str,
        expires_in: u64,
    ) -> anyhow::Result<String>;
}

#[derive(Debug, Deserialize)]
struct SignedUrlResponse {
    #[serde(rename = "signedURL")]
    signed_url: String,
}

pub struct HttpObjectStore {
    http: reqwest::Client,
    base: Url,
    service_key: String,
}

impl HttpObjectStore {
    pub fn new(storage_url: &str, service_key: impl Into<String>) -> anyhow::Result<Self> {
        let mut base = Url::parse(storage_url)
            .with_context(|| format!("invalid storage url '{storage_url}'"))?;
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base,
            service_key: service_key.into(),
        })
    }

    /// The provider answers with a path relative to its API root; join it
    /// back onto the base so callers always get an absolute URL.
    fn absolute(&self, signed_path: &str) -> anyhow::Result<String> {
        if signed_path.starts_with("http://") || signed_path.starts_with("https://") {
            return Ok(signed_path.to_string());
        }
        let relative = format!("storage/v1/{}", signed_path.trim_start_matches('/'));
        let joined = self
            .base
            .join(&relative)
            .context("joining signed path onto storage url")?;
        Ok(joined.to_string())
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn create_signed_url(
        &self,
        bucket: &str,
        path: &str,
        expires_in: u64,
    ) -> anyhow::Result<String> {
        let endpoint = self
            .base
            .join(&format!(
                "storage/v1/object/sign/{}/{}",
                bucket,
                path.trim_start_matches('/')
            ))
            .context("building sign endpoint")?;
        let response: SignedUrlResponse = self
            .http
            .post(endpoint)
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .json(&serde_json::json!({ "expiresIn": expires_in }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!(bucket, path, expires_in, "storage: created signed url");
        self.absolute(&response.signed_url)
    }
}

#[cfg(test)]
#[path = "tests/storage_api_tests.rs"]
mod tests;
