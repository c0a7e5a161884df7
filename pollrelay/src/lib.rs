//! # Pollrelay
//!
//! Turns a push-based upstream stream of concatenated JSON objects into
//! sessions that clients poll with a cursor.
//!
//! A caller starts a session and gets its id back immediately; a background
//! task posts the request upstream, frames the response bytes into JSON
//! objects and stores the `begin` / `item` / `end` chunks. Pollers ask for
//! everything from their cursor onwards until the session completes.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pollrelay::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let relay = Relay::builder()
//!         .upstream_client(Arc::new(HttpUpstreamClient::new()?))
//!         .upstream_url("http://localhost:5678/webhook/ai")
//!         .build()?;
//!
//!     let id = relay.start_session(SessionRequest::new("Hello!"));
//!
//!     let mut cursor = 0;
//!     loop {
//!         match relay.poll_session(&id, cursor) {
//!             PollResult::Ok(snapshot) => {
//!                 for chunk in &snapshot.chunks {
//!                     println!("{}: {}", chunk.kind, chunk.content);
//!                 }
//!                 cursor = snapshot.next_cursor();
//!                 if snapshot.completed {
//!                     break;
//!                 }
//!             }
//!             PollResult::Failed(message) => anyhow::bail!(message),
//!             PollResult::NotFound => break,
//!         }
//!         tokio::time::sleep(std::time::Duration::from_millis(200)).await;
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **`pollrelay-types`**: chunks, snapshots and relay states
//! - **`pollrelay-stream`**: incremental JSON framing, chunk classification, upstream client
//! - **`pollrelay-store`**: in-memory session store and reaper
//! - **`pollrelay-engine`**: per-session relay task

pub mod prelude;

pub use pollrelay_types::{Chunk, ChunkKind, PollResult, RelayState, SessionRequest, Snapshot};

pub use pollrelay_stream::{
    classify, parse_frame_stream, ByteStream, ChunkStream, FrameParser, HttpUpstreamClient,
    RelayError, UpstreamClient,
};

pub use pollrelay_store::{Session, SessionId, SessionReaper, SessionStore, StoreError, DEFAULT_SESSION_TTL};

pub use pollrelay_engine::{Relay, RelayBuilder, RelayConfig};
