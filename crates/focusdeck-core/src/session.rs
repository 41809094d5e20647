//! Completed-session records and the append-only store contract.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Immutable record of one finished focus phase.
///
/// Appended to the store at the moment of completion and never mutated or
/// deleted by the scheduler afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedSession {
    /// Configured focus duration at the time the phase elapsed, in seconds.
    pub duration_secs: u64,
    pub timestamp: DateTime<Utc>,
    pub completed: bool,
}

/// Append-only sink for completed focus sessions.
///
/// The scheduler calls `append` once per focus completion and swallows any
/// error (logged, never rethrown into the tick path). Implementations must
/// not block the caller.
pub trait SessionStore {
    /// Persist one completed session.
    ///
    /// # Errors
    /// Implementation-specific; the scheduler treats a failure as a lost
    /// record, not a state-machine fault.
    fn append(&mut self, session: CompletedSession) -> Result<(), StoreError>;
}

/// In-memory store, shared by cloning.
///
/// Tests hand one clone to the scheduler and inspect the other after
/// driving ticks.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    sessions: Arc<Mutex<Vec<CompletedSession>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything appended so far.
    pub fn sessions(&self) -> Vec<CompletedSession> {
        self.sessions.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for MemorySessionStore {
    fn append(&mut self, session: CompletedSession) -> Result<(), StoreError> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|_| StoreError::QueryFailed("memory store lock poisoned".to_string()))?;
        sessions.push(session);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_contents() {
        let store = MemorySessionStore::new();
        let mut handle = store.clone();
        handle
            .append(CompletedSession {
                duration_secs: 1500,
                timestamp: Utc::now(),
                completed: true,
            })
            .unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.sessions()[0].duration_secs, 1500);
    }
}
