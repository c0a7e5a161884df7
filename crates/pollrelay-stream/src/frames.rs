use futures::{Stream, StreamExt};
use pollrelay_types::Chunk;
use serde_json::Value;
use std::pin::Pin;

use crate::classifier::classify;
use crate::error::{RelayError, Result};
use crate::framer::FrameParser;
use crate::upstream::ByteStream;

/// Retained chunks in upstream order; an `Err` item is a transport failure
/// and is always the last item
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<Chunk>> + Send>>;

/// Turn raw upstream fragments into classified chunks
///
/// Malformed values and values the classifier drops are skipped without
/// disturbing the framing of later values.
pub fn parse_frame_stream(fragments: ByteStream) -> ChunkStream {
    Box::pin(async_stream::stream! {
        let mut fragments = fragments;
        let mut parser = FrameParser::new();

        while let Some(fragment) = fragments.next().await {
            match fragment {
                Ok(bytes) => {
                    tracing::trace!(len = bytes.len(), "Received fragment");
                    parser.extend(&bytes);

                    while let Some(frame) = parser.next_frame() {
                        match frame.and_then(|text| parse_value(&text)) {
                            Ok(value) => {
                                if let Some(chunk) = classify(&value) {
                                    yield Ok(chunk);
                                }
                            }
                            Err(e) => tracing::warn!(error = %e, "Dropping malformed value"),
                        }
                    }
                }
                Err(e) => {
                    yield Err(e);
                    break;
                }
            }
        }

        if parser.has_pending() {
            tracing::debug!(buffered = parser.buffered_len(), "Stream ended inside an unclosed value");
        }
    })
}

fn parse_value(text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|e| RelayError::MalformedValue(e.to_string()))
}
