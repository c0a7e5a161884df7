use futures::StreamExt;
use pollrelay_store::{SessionId, SessionReaper, SessionStore};
use pollrelay_stream::{parse_frame_stream, ByteStream, RelayError, UpstreamClient};
use pollrelay_types::{PollResult, RelayState, SessionRequest};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::builder::RelayBuilder;

/// Settings shared by every session a relay starts
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub upstream_url: String,
    pub session_ttl: Duration,
    /// Also reclaim sessions that end in failure
    pub evict_failed: bool,
}

/// Starts sessions and relays each one's upstream stream in the background
#[derive(Clone)]
pub struct Relay {
    client: Arc<dyn UpstreamClient>,
    store: SessionStore,
    reaper: SessionReaper,
    config: Arc<RelayConfig>,
}

impl Relay {
    pub fn new(client: Arc<dyn UpstreamClient>, store: SessionStore, config: RelayConfig) -> Self {
        let reaper = SessionReaper::new(store.clone(), config.session_ttl);
        Self {
            client,
            store,
            reaper,
            config: Arc::new(config),
        }
    }

    /// Create a builder for fluent construction
    pub fn builder() -> RelayBuilder {
        RelayBuilder::new()
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Create a session and start relaying it; returns without waiting for
    /// any upstream byte
    pub fn start_session(&self, request: SessionRequest) -> SessionId {
        let (id, _handle) = self.spawn_session(request);
        id
    }

    /// Like `start_session`, also handing back the relay task so callers can
    /// observe where it ended
    pub fn spawn_session(&self, request: SessionRequest) -> (SessionId, JoinHandle<RelayState>) {
        let id = self.store.create();
        tracing::info!(
            session_id = %id,
            context = ?request.context,
            "Starting stream session"
        );

        let task = SessionTask {
            id: id.clone(),
            client: Arc::clone(&self.client),
            store: self.store.clone(),
            reaper: self.reaper.clone(),
            config: Arc::clone(&self.config),
            state: RelayState::Requesting,
        };

        let handle = tokio::spawn(task.run(request));
        (id, handle)
    }

    /// Chunks of a session from `cursor` onwards
    pub fn poll_session(&self, id: &str, cursor: usize) -> PollResult {
        self.store.snapshot(id, cursor)
    }
}

/// The single writer of one session
struct SessionTask {
    id: SessionId,
    client: Arc<dyn UpstreamClient>,
    store: SessionStore,
    reaper: SessionReaper,
    config: Arc<RelayConfig>,
    state: RelayState,
}

impl SessionTask {
    async fn run(mut self, request: SessionRequest) -> RelayState {
        let payload = match serde_json::to_value(&request) {
            Ok(payload) => payload,
            Err(e) => return self.fail(RelayError::Connection(e.to_string())),
        };

        tracing::debug!(
            session_id = %self.id,
            url = %self.config.upstream_url,
            "Sending upstream request"
        );

        let opened = self.open(&payload).await;
        let fragments = match opened {
            Ok(fragments) => fragments,
            Err(e) => return self.fail(e),
        };

        self.transition(RelayState::Streaming);
        let mut chunks = parse_frame_stream(fragments);

        while let Some(item) = chunks.next().await {
            match item {
                Ok(chunk) => {
                    tracing::debug!(
                        session_id = %self.id,
                        kind = %chunk.kind,
                        content = %preview(&chunk.content),
                        "Storing chunk"
                    );
                    if !self.store.append(&self.id, chunk) {
                        tracing::debug!(session_id = %self.id, "Session gone, chunk discarded");
                    }
                }
                Err(e) => return self.fail(e),
            }
        }

        self.complete()
    }

    async fn open(&self, payload: &Value) -> Result<ByteStream, RelayError> {
        self.client.open_stream(&self.config.upstream_url, payload).await
    }

    fn complete(mut self) -> RelayState {
        self.transition(RelayState::Completed);

        match self.store.mark_completed(&self.id) {
            Ok(true) => {
                self.reaper.schedule(&self.id);
            }
            Ok(false) => tracing::warn!(session_id = %self.id, "Session already terminal"),
            Err(e) => tracing::warn!(session_id = %self.id, error = %e, "Cannot complete session"),
        }

        self.state
    }

    fn fail(mut self, error: RelayError) -> RelayState {
        tracing::error!(session_id = %self.id, error = %error, "Stream session failed");
        self.transition(RelayState::Failed);

        match self.store.mark_error(&self.id, error.to_string()) {
            Ok(true) if self.config.evict_failed => {
                self.reaper.schedule(&self.id);
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(session_id = %self.id, error = %e, "Cannot fail session"),
        }

        self.state
    }

    fn transition(&mut self, next: RelayState) {
        debug_assert!(!self.state.is_terminal(), "relay left a terminal state");
        tracing::info!(
            session_id = %self.id,
            from = %self.state,
            to = %next,
            "Relay state changed"
        );
        self.state = next;
    }
}

fn preview(content: &str) -> String {
    content.chars().take(20).collect()
}
