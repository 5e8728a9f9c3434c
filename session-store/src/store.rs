//! The session store contract.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::SessionStoreError;
use crate::turn::{Role, Turn};

/// Ordered, append-only chat history per session.
///
/// Implementations must make each append a single atomic store operation so
/// that concurrent appends never corrupt a record. No cross-call ordering is
/// guaranteed beyond "last appended is last".
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Appends a turn and resets the session expiry.
    ///
    /// # Errors
    /// Returns [`SessionStoreError::Unavailable`] when the store is unreachable.
    async fn append_turn(
        &self,
        session_id: &str,
        role: Role,
        text: &str,
    ) -> Result<(), SessionStoreError>;

    /// Returns all turns in append order; empty for unknown or expired sessions.
    async fn list_turns(&self, session_id: &str) -> Result<Vec<Turn>, SessionStoreError>;

    /// Deletes the session's history. Clearing a missing session succeeds.
    async fn clear_session(&self, session_id: &str) -> Result<(), SessionStoreError>;
}

/// Namespaced key of a session's history list.
pub fn history_key(session_id: &str) -> String {
    format!("sess:{session_id}:history")
}

/// Generates a new opaque session identifier (UUID v4).
pub fn new_session_id() -> String {
    Uuid::new_v4().to_string()
}
