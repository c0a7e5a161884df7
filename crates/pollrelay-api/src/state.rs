use pollrelay::Relay;
use std::sync::Arc;

use crate::config::Config;

/// Shared application state passed to all handlers
///
/// The relay owns the session store; handlers only start and poll sessions
/// through it.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub relay: Arc<Relay>,
}

impl AppState {
    pub fn new(config: Config, relay: Relay) -> Self {
        Self {
            config: Arc::new(config),
            relay: Arc::new(relay),
        }
    }
}
