pub mod classifier;
pub mod error;
pub mod framer;
pub mod frames;
pub mod upstream;

pub use classifier::classify;
pub use error::{RelayError, Result};
pub use framer::FrameParser;
pub use frames::{parse_frame_stream, ChunkStream};
pub use upstream::{ByteStream, HttpUpstreamClient, UpstreamClient};
