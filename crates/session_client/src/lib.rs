pub mod auth;
pub mod documents;
pub mod sync;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use shared::domain::{DocumentSummary, SessionUser};
use shared::protocol::{SessionEvent, SignedUrlResult};
use tokio::sync::broadcast;

pub use auth::{AuthClient, AuthConfig, AuthError};
pub use documents::{DocumentsClient, DocumentsConfig, DocumentsError};
pub use sync::{SessionSyncListener, SoftRefresh};

/// Everything a portal frontend needs from the session backend.
///
/// The trait exists so UI layers and tests can swap the real HTTP clients
/// for fakes without threading concrete types through.
#[async_trait]
pub trait PortalBackend: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<SessionUser>;
    async fn sign_out(&self) -> Result<()>;
    /// Lists the signed-in user's document folder.
    async fn list_documents(&self) -> Result<Vec<DocumentSummary>>;
    /// Requests short-lived download links for the given storage paths.
    async fn sign_documents(&self, paths: Vec<String>) -> Result<Vec<SignedUrlResult>>;
    fn subscribe_session_events(&self) -> broadcast::Receiver<SessionEvent>;
}

/// Default wiring: one auth client plus one documents client sharing it.
pub struct PortalClient {
    auth: Arc<AuthClient>,
    documents: DocumentsClient,
}

impl PortalClient {
    pub fn new(auth_config: AuthConfig, documents_config: DocumentsConfig) -> Self {
        let auth = AuthClient::new(auth_config);
        let documents = DocumentsClient::new(documents_config, auth.clone());
        Self { auth, documents }
    }

    pub fn auth(&self) -> &Arc<AuthClient> {
        &self.auth
    }

    pub fn documents(&self) -> &DocumentsClient {
        &self.documents
    }
}

#[async_trait]
impl PortalBackend for PortalClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<SessionUser> {
        Ok(self.auth.sign_in(email, password).await?)
    }

    async fn sign_out(&self) -> Result<()> {
        Ok(self.auth.sign_out().await?)
    }

    async fn list_documents(&self) -> Result<Vec<DocumentSummary>> {
        let user = self
            .auth
            .current_user()
            .await
            .ok_or(DocumentsError::NotSignedIn)?;
        // Storage keys documents under a per-user folder named by the user id.
        let prefix = user.id.0.to_string();
        Ok(self.documents.list_documents(&prefix).await?)
    }

    async fn sign_documents(&self, paths: Vec<String>) -> Result<Vec<SignedUrlResult>> {
        Ok(self.documents.sign_documents(paths, None).await?)
    }

    fn subscribe_session_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.auth.subscribe_events()
    }
}
