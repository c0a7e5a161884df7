use std::time::Duration;
use tokio::task::JoinHandle;

use crate::store::SessionStore;

/// Default time a finished session stays readable
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(5 * 60);

/// Removes sessions a fixed delay after they finish
#[derive(Clone)]
pub struct SessionReaper {
    store: SessionStore,
    ttl: Duration,
}

impl SessionReaper {
    pub fn new(store: SessionStore, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Schedule a one-shot eviction of `id` after the TTL
    ///
    /// The eviction is not cancellable and fires exactly once.
    pub fn schedule(&self, id: &str) -> JoinHandle<()> {
        let store = self.store.clone();
        let ttl = self.ttl;
        let id = id.to_string();

        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            if store.evict(&id) {
                tracing::info!(session_id = %id, "Evicted expired session");
            }
        })
    }
}
