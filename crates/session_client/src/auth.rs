use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use shared::domain::{SessionUser, UserId};
use shared::protocol::{Session, SessionEvent};
use thiserror::Error;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Seconds before token expiry at which the background refresh fires.
const REFRESH_MARGIN_SECS: i64 = 60;

const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Base URL of the identity provider, without a trailing slash.
    pub identity_url: String,
    /// Public API key sent alongside every identity request.
    pub api_key: String,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("identity provider rejected the credentials")]
    InvalidCredentials,
    #[error("no active session")]
    NotSignedIn,
    #[error("identity request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("malformed identity response: {0}")]
    Malformed(String),
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
    user: ProviderUser,
}

#[derive(Debug, Deserialize)]
struct ProviderUser {
    id: UserId,
    #[serde(default)]
    email: Option<String>,
}

/// Password-grant client for the hosted identity provider.
///
/// Owns the current [`Session`] and broadcasts [`SessionEvent`]s whenever it
/// changes. A background task refreshes the access token shortly before it
/// expires; the task holds only a weak reference, so dropping the client (or
/// signing out) tears it down.
pub struct AuthClient {
    http: reqwest::Client,
    config: AuthConfig,
    session: RwLock<Option<Session>>,
    events: broadcast::Sender<SessionEvent>,
    refresh_task: Mutex<Option<JoinHandle<()>>>,
    weak_self: Weak<AuthClient>,
}

impl AuthClient {
    pub fn new(config: AuthConfig) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new_cyclic(|weak| Self {
            http: reqwest::Client::new(),
            config,
            session: RwLock::new(None),
            events,
            refresh_task: Mutex::new(None),
            weak_self: weak.clone(),
        })
    }

    /// Subscribe to session lifecycle notifications. Receivers that fall
    /// behind see `RecvError::Lagged` and can simply continue.
    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub async fn session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    pub async fn current_user(&self) -> Option<SessionUser> {
        self.session.read().await.as_ref().map(|s| s.user.clone())
    }

    pub async fn access_token(&self) -> Option<String> {
        self.session
            .read()
            .await
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    /// Exchanges credentials for a session via the password grant.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SessionUser, AuthError> {
        let response = self
            .http
            .post(format!("{}/token", self.config.identity_url))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.config.api_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;
        if matches!(
            response.status(),
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED
        ) {
            return Err(AuthError::InvalidCredentials);
        }
        let token: TokenResponse = response.error_for_status()?.json().await?;
        let session = self.install_session(token).await?;
        info!(user_id = %session.user.id.0, "auth: signed in");
        let _ = self.events.send(SessionEvent::SignedIn);
        Ok(session.user)
    }

    /// Rotates the session with the refresh-token grant.
    pub async fn refresh(&self) -> Result<(), AuthError> {
        let refresh_token = self
            .session
            .read()
            .await
            .as_ref()
            .map(|s| s.refresh_token.clone())
            .ok_or(AuthError::NotSignedIn)?;
        let response = self
            .http
            .post(format!("{}/token", self.config.identity_url))
            .query(&[("grant_type", "refresh_token")])
            .header("apikey", &self.config.api_key)
            .json(&serde_json::json!({ "refresh_token": refresh_token }))
            .send()
            .await?;
        if matches!(
            response.status(),
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED
        ) {
            return Err(AuthError::InvalidCredentials);
        }
        let token: TokenResponse = response.error_for_status()?.json().await?;
        self.install_session(token).await?;
        debug!("auth: session refreshed");
        let _ = self.events.send(SessionEvent::TokenRefreshed);
        Ok(())
    }

    /// Revokes the session with the provider and clears local state.
    ///
    /// A provider-side logout failure is logged but does not keep the local
    /// session alive; signing out always succeeds locally.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let Some(session) = self.session.write().await.take() else {
            return Ok(());
        };
        self.abort_refresh_task();
        let result = self
            .http
            .post(format!("{}/logout", self.config.identity_url))
            .header("apikey", &self.config.api_key)
            .bearer_auth(&session.access_token)
            .send()
            .await;
        if let Err(err) = result {
            warn!(error = %err, "auth: provider logout failed");
        }
        info!("auth: signed out");
        let _ = self.events.send(SessionEvent::SignedOut);
        Ok(())
    }

    async fn install_session(&self, token: TokenResponse) -> Result<Session, AuthError> {
        if token.access_token.is_empty() {
            return Err(AuthError::Malformed("empty access token".into()));
        }
        let session = Session {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_at: Utc::now() + chrono::Duration::seconds(token.expires_in.max(0)),
            user: SessionUser {
                id: token.user.id,
                email: token.user.email.unwrap_or_default(),
            },
        };
        *self.session.write().await = Some(session.clone());
        self.schedule_refresh(session.expires_at);
        Ok(session)
    }

    fn schedule_refresh(&self, expires_at: DateTime<Utc>) {
        let weak = self.weak_self.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(refresh_delay(expires_at, Utc::now())).await;
            let Some(client) = weak.upgrade() else {
                return;
            };
            if let Err(err) = client.refresh().await {
                warn!(error = %err, "auth: automatic refresh failed");
            }
        });
        let mut guard = self.refresh_task.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(old) = guard.replace(handle) {
            old.abort();
        }
    }

    fn abort_refresh_task(&self) {
        let mut guard = self.refresh_task.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(task) = guard.take() {
            task.abort();
        }
    }

    #[cfg(test)]
    pub(crate) async fn install_test_session(&self, session: Session) {
        *self.session.write().await = Some(session);
    }
}

impl Drop for AuthClient {
    fn drop(&mut self) {
        self.abort_refresh_task();
    }
}

/// Time to wait before refreshing a token that expires at `expires_at`,
/// with a one second floor for very short-lived tokens.
fn refresh_delay(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    let secs = (expires_at - now).num_seconds() - REFRESH_MARGIN_SECS;
    Duration::from_secs(secs.max(1) as u64)
}

#[cfg(test)]
#[path = "tests/auth_tests.rs"]
mod tests;
