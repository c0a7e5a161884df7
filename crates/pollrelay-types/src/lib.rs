pub mod chunk;
pub mod request;
pub mod snapshot;
pub mod state;

pub use chunk::{Chunk, ChunkKind};
pub use request::SessionRequest;
pub use snapshot::{PollResult, Snapshot};
pub use state::RelayState;
