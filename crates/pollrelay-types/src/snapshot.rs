use serde::{Deserialize, Serialize};

use crate::chunk::Chunk;

/// Chunks of a session from a cursor onwards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub chunks: Vec<Chunk>,
    pub completed: bool,
    #[serde(rename = "totalChunks")]
    pub total_count: usize,
}

impl Snapshot {
    /// Cursor the caller should send on its next poll
    pub fn next_cursor(&self) -> usize {
        self.total_count
    }
}

/// Outcome of polling a session
#[derive(Debug, Clone, PartialEq)]
pub enum PollResult {
    /// Unknown or already evicted session
    NotFound,
    /// Session reached its error state; buffered chunks are withheld
    Failed(String),
    Ok(Snapshot),
}

impl PollResult {
    pub fn is_not_found(&self) -> bool {
        matches!(self, PollResult::NotFound)
    }

    pub fn into_snapshot(self) -> Option<Snapshot> {
        match self {
            PollResult::Ok(snapshot) => Some(snapshot),
            _ => None,
        }
    }
}
