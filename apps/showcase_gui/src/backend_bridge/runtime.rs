//! Backend worker: owns the tokio runtime and the portal client, and pumps
//! UI commands until the command channel closes.

use std::sync::Arc;
use std::thread;

use crossbeam_channel::{Receiver, Sender};
use session_client::{
    AuthConfig, DocumentsConfig, PortalBackend, PortalClient, SessionSyncListener, SoftRefresh,
};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::ui::StartupConfig;

/// Forwards soft-refresh nudges from the session sync listener onto the UI
/// event queue.
struct UiRefresher {
    ui_tx: Sender<UiEvent>,
}

#[async_trait::async_trait]
impl SoftRefresh for UiRefresher {
    async fn refresh(&self) {
        let _ = self.ui_tx.try_send(UiEvent::SoftRefresh);
    }
}

pub fn launch(config: StartupConfig, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));

        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let portal = PortalClient::new(
                AuthConfig {
                    identity_url: config.identity_url,
                    api_key: config.api_key,
                },
                DocumentsConfig {
                    storage_url: config.storage_url,
                    signer_url: config.signer_url,
                    bucket: config.bucket,
                },
            );

            // Session transitions nudge the UI to re-pull view data instead
            // of tearing the surface down.
            let _session_sync = SessionSyncListener::spawn(
                portal.subscribe_session_events(),
                Arc::new(UiRefresher {
                    ui_tx: ui_tx.clone(),
                }),
            );

            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::SignIn { email, password } => {
                        match portal.sign_in(&email, &password).await {
                            Ok(user) => {
                                let _ = ui_tx.try_send(UiEvent::SignedIn { user });
                            }
                            Err(err) => {
                                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                                    UiErrorContext::SignIn,
                                    err.to_string(),
                                )));
                            }
                        }
                    }
                    BackendCommand::SignOut => match portal.sign_out().await {
                        Ok(()) => {
                            let _ = ui_tx.try_send(UiEvent::SignedOut);
                        }
                        Err(err) => {
                            let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                                UiErrorContext::SignOut,
                                err.to_string(),
                            )));
                        }
                    },
                    BackendCommand::FetchDocuments => {
                        if portal.auth().current_user().await.is_none() {
                            // Refresh after sign-out; an empty listing clears
                            // the view.
                            let _ = ui_tx.try_send(UiEvent::Documents(Vec::new()));
                            continue;
                        }
                        match portal.list_documents().await {
                            Ok(documents) => {
                                let _ = ui_tx.try_send(UiEvent::Documents(documents));
                            }
                            Err(err) => {
                                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                                    UiErrorContext::FetchDocuments,
                                    err.to_string(),
                                )));
                            }
                        }
                    }
                    BackendCommand::SignDocuments { paths } => {
                        match portal.sign_documents(paths).await {
                            Ok(results) => {
                                let _ = ui_tx.try_send(UiEvent::DocumentLinks(results));
                            }
                            Err(err) => {
                                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                                    UiErrorContext::SignLinks,
                                    err.to_string(),
                                )));
                            }
                        }
                    }
                }
            }
        });
    });
}
