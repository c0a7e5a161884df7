use pollrelay_types::{Chunk, ChunkKind};
use serde_json::Value;

/// Decide whether a parsed upstream value is worth storing
///
/// `begin` and `end` are always kept (content defaults to empty), `item` only
/// when it carries non-empty string content. Everything else is dropped.
pub fn classify(value: &Value) -> Option<Chunk> {
    let tag = value.get("type").and_then(Value::as_str)?;
    let content = value.get("content").and_then(Value::as_str);

    let Some(kind) = ChunkKind::from_tag(tag) else {
        tracing::debug!(tag = %tag, "Dropping value with unrecognized type");
        return None;
    };

    match kind {
        ChunkKind::Item => match content {
            Some(text) if !text.is_empty() => Some(Chunk::item(text)),
            _ => None,
        },
        ChunkKind::Begin | ChunkKind::End => Some(Chunk::new(kind, content.unwrap_or_default())),
    }
}
