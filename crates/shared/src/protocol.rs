use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::SessionUser;

/// Authentication state notifications emitted by the identity-provider client.
///
/// Wire names follow the provider's event vocabulary. The session sync
/// listener reacts to `SignedIn`, `SignedOut` and `TokenRefreshed`; all other
/// variants are delivered but ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionEvent {
    SignedIn,
    SignedOut,
    TokenRefreshed,
    UserUpdated,
    PasswordRecovery,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub user: SessionUser,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

pub const DEFAULT_SIGN_BUCKET: &str = "invoice-docs";
pub const DEFAULT_SIGN_EXPIRES_IN_SECS: u64 = 600;

pub fn sign_batch_route() -> &'static str {
    "/storage/sign"
}

/// Batch request accepted by the signed-URL gateway.
///
/// `paths` defaults to empty when the field is absent so the handler can
/// reject both the missing and the empty form with the same 400 response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignBatchRequest {
    #[serde(default)]
    pub paths: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
    #[serde(
        default,
        rename = "expiresIn",
        skip_serializing_if = "Option::is_none"
    )]
    pub expires_in: Option<u64>,
}

/// Per-path outcome. Exactly one of `url` / `error` is populated; both are
/// serialized even when null so partial batches stay easy to consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedUrlResult {
    pub path: String,
    pub url: Option<String>,
    pub error: Option<String>,
}

impl SignedUrlResult {
    pub fn signed(path: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            url: Some(url.into()),
            error: None,
        }
    }

    pub fn failed(path: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            url: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignBatchResponse {
    pub results: Vec<SignedUrlResult>,
}
