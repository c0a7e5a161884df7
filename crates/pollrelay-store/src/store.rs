use pollrelay_types::{Chunk, PollResult};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{Result, StoreError};
use crate::session::{Session, SessionId};

/// In-memory store of streaming sessions
///
/// Cloning is cheap and every clone shares the same sessions. Each operation
/// holds the lock for a single lookup plus one push or assignment, so
/// nothing here ever awaits. Pollers see a chunk only after it is fully
/// appended.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new open session and return its id
    pub fn create(&self) -> SessionId {
        let id = uuid::Uuid::new_v4().to_string();
        self.write().insert(id.clone(), Session::new(id.clone()));
        tracing::debug!(session_id = %id, "Session created");
        id
    }

    /// Append a chunk, stamping it with the storage time
    ///
    /// Returns false (and stores nothing) when the session no longer exists.
    pub fn append(&self, id: &str, chunk: Chunk) -> bool {
        match self.write().get_mut(id) {
            Some(session) => {
                session.chunks.push(chunk.stamped());
                true
            }
            None => false,
        }
    }

    /// Mark the session as normally completed
    ///
    /// Returns Ok(false) when a terminal marker was already set; the existing
    /// marker is kept.
    pub fn mark_completed(&self, id: &str) -> Result<bool> {
        let mut sessions = self.write();
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| StoreError::SessionNotFound(id.to_string()))?;

        if session.is_terminal() {
            return Ok(false);
        }
        session.completed = true;
        Ok(true)
    }

    /// Put the session into its terminal failure state
    ///
    /// Returns Ok(false) when a terminal marker was already set.
    pub fn mark_error(&self, id: &str, message: impl Into<String>) -> Result<bool> {
        let mut sessions = self.write();
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| StoreError::SessionNotFound(id.to_string()))?;

        if session.is_terminal() {
            return Ok(false);
        }
        session.error = Some(message.into());
        Ok(true)
    }

    /// Chunks of a session starting at `cursor`
    pub fn snapshot(&self, id: &str, cursor: usize) -> PollResult {
        self.read()
            .get(id)
            .map_or(PollResult::NotFound, |session| session.snapshot(cursor))
    }

    /// Remove a session; returns whether it existed
    pub fn evict(&self, id: &str) -> bool {
        self.write().remove(id).is_some()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.read().contains_key(id)
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // A panic elsewhere cannot leave a session half-written, so a poisoned
    // lock is still safe to use.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<SessionId, Session>> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<SessionId, Session>> {
        self.sessions.write().unwrap_or_else(PoisonError::into_inner)
    }
}
