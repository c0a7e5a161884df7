//! Prelude module for convenient imports
//!
//! ```rust
//! use pollrelay::prelude::*;
//! ```

pub use crate::{
    Chunk, ChunkKind, PollResult, RelayState, SessionRequest, Snapshot,
    HttpUpstreamClient, RelayError, UpstreamClient,
    SessionStore,
    Relay, RelayBuilder, RelayConfig,
};
