use chrono::{DateTime, Utc};
use pollrelay_types::{Chunk, PollResult, Snapshot};

pub type SessionId = String;

/// State of one streaming exchange
///
/// `completed` and `error` are terminal markers: at most one of them is ever
/// set and neither is cleared. `chunks` only grows.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub chunks: Vec<Chunk>,
    pub completed: bool,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: impl Into<SessionId>) -> Self {
        Self {
            id: id.into(),
            chunks: Vec::new(),
            completed: false,
            error: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.completed || self.error.is_some()
    }

    /// Chunks from `cursor` onwards; an error withholds every chunk
    pub fn snapshot(&self, cursor: usize) -> PollResult {
        if let Some(message) = &self.error {
            return PollResult::Failed(message.clone());
        }

        let from = cursor.min(self.chunks.len());
        PollResult::Ok(Snapshot {
            chunks: self.chunks[from..].to_vec(),
            completed: self.completed,
            total_count: self.chunks.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_open_and_empty() {
        let session = Session::new("abc");

        assert_eq!(session.id, "abc");
        assert!(session.chunks.is_empty());
        assert!(!session.is_terminal());
    }

    #[test]
    fn test_snapshot_clamps_cursor() {
        let mut session = Session::new("abc");
        session.chunks.push(Chunk::begin(""));

        let snapshot = session.snapshot(10).into_snapshot().unwrap();
        assert!(snapshot.chunks.is_empty());
        assert_eq!(snapshot.total_count, 1);
    }
}
