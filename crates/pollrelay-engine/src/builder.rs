use anyhow::{anyhow, Result};
use pollrelay_store::{SessionStore, DEFAULT_SESSION_TTL};
use pollrelay_stream::UpstreamClient;
use std::sync::Arc;
use std::time::Duration;

use crate::relay::{Relay, RelayConfig};

/// Builder for constructing a Relay with optional components
pub struct RelayBuilder {
    client: Option<Arc<dyn UpstreamClient>>,
    store: Option<SessionStore>,
    upstream_url: Option<String>,
    session_ttl: Duration,
    evict_failed: bool,
}

impl RelayBuilder {
    pub fn new() -> Self {
        Self {
            client: None,
            store: None,
            upstream_url: None,
            session_ttl: DEFAULT_SESSION_TTL,
            evict_failed: false,
        }
    }

    /// Set the client used to open upstream streams
    pub fn upstream_client(mut self, client: Arc<dyn UpstreamClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// URL every session's request is posted to
    pub fn upstream_url(mut self, url: impl Into<String>) -> Self {
        self.upstream_url = Some(url.into());
        self
    }

    /// Share an existing store (a fresh one is created otherwise)
    pub fn store(mut self, store: SessionStore) -> Self {
        self.store = Some(store);
        self
    }

    /// How long a finished session stays readable
    pub fn session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Reclaim failed sessions after the TTL as well
    pub fn evict_failed(mut self, enabled: bool) -> Self {
        self.evict_failed = enabled;
        self
    }

    /// Build the Relay
    pub fn build(self) -> Result<Relay> {
        let client = self
            .client
            .ok_or_else(|| anyhow!("Upstream client is required"))?;
        let upstream_url = self
            .upstream_url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| anyhow!("Upstream URL is required"))?;

        Ok(Relay::new(
            client,
            self.store.unwrap_or_default(),
            RelayConfig {
                upstream_url,
                session_ttl: self.session_ttl,
                evict_failed: self.evict_failed,
            },
        ))
    }
}

impl Default for RelayBuilder {
    fn default() -> Self {
        Self::new()
    }
}
