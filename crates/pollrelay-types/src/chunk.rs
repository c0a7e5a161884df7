use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a retained unit of streamed content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkKind {
    Begin,
    Item,
    End,
}

impl ChunkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkKind::Begin => "begin",
            ChunkKind::Item => "item",
            ChunkKind::End => "end",
        }
    }

    /// Map an upstream `type` tag to a kind, if it is one we retain
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "begin" => Some(ChunkKind::Begin),
            "item" => Some(ChunkKind::Item),
            "end" => Some(ChunkKind::End),
            _ => None,
        }
    }
}

impl fmt::Display for ChunkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One stored chunk of a session
///
/// Serialized the way pollers receive it: `{"type", "content", "timestamp"}`
/// with the timestamp in epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    #[serde(rename = "type")]
    pub kind: ChunkKind,
    pub content: String,
    #[serde(rename = "timestamp", with = "chrono::serde::ts_milliseconds")]
    pub produced_at: DateTime<Utc>,
}

impl Chunk {
    pub fn new(kind: ChunkKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            produced_at: Utc::now(),
        }
    }

    pub fn begin(content: impl Into<String>) -> Self {
        Self::new(ChunkKind::Begin, content)
    }

    pub fn item(content: impl Into<String>) -> Self {
        Self::new(ChunkKind::Item, content)
    }

    pub fn end(content: impl Into<String>) -> Self {
        Self::new(ChunkKind::End, content)
    }

    /// Restamp with the current time (used when the chunk is stored)
    pub fn stamped(mut self) -> Self {
        self.produced_at = Utc::now();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_serializes_with_type_tag() {
        let chunk = Chunk::item("hello");
        let json = serde_json::to_value(&chunk).unwrap();

        assert_eq!(json["type"], "item");
        assert_eq!(json["content"], "hello");
        assert!(json["timestamp"].is_i64());
    }

    #[test]
    fn test_kind_from_tag() {
        assert_eq!(ChunkKind::from_tag("begin"), Some(ChunkKind::Begin));
        assert_eq!(ChunkKind::from_tag("end"), Some(ChunkKind::End));
        assert_eq!(ChunkKind::from_tag("ITEM"), None);
        assert_eq!(ChunkKind::from_tag("progress"), None);
    }
}
