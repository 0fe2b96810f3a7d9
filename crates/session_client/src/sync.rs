use std::sync::Arc;

use async_trait::async_trait;
use shared::protocol::SessionEvent;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

/// Receiver side of a soft refresh.
///
/// Implementations re-fetch whatever server-derived view data a session
/// change may have invalidated. They must not tear down or rebuild the view
/// itself; the point is to keep what is on screen while its data reloads.
#[async_trait]
pub trait SoftRefresh: Send + Sync {
    async fn refresh(&self);
}

/// Bridges auth session events to a [`SoftRefresh`] target.
///
/// Reacts to `SignedIn`, `SignedOut` and `TokenRefreshed`; every other event
/// is ignored. The background task ends when the event channel closes and is
/// aborted when the listener is dropped.
pub struct SessionSyncListener {
    task: JoinHandle<()>,
}

impl SessionSyncListener {
    pub fn spawn(
        mut events: broadcast::Receiver<SessionEvent>,
        refresher: Arc<dyn SoftRefresh>,
    ) -> Self {
        let task = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(
                        event @ (SessionEvent::SignedIn
                        | SessionEvent::SignedOut
                        | SessionEvent::TokenRefreshed),
                    ) => {
                        debug!(?event, "session sync: refreshing view data");
                        refresher.refresh().await;
                    }
                    Ok(other) => {
                        trace!(event = ?other, "session sync: ignoring event");
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "session sync: lagged behind session events");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
        Self { task }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for SessionSyncListener {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
#[path = "tests/sync_tests.rs"]
mod tests;
