//! Typed error for the contextor crate.

use thiserror::Error;

/// Failures that abort a chat turn.
///
/// Provider failures never show up here: retrieval degrades to no context and
/// completion degrades to a substitute reply. Only the session store can fail
/// a request.
#[derive(Debug, Error)]
pub enum ContextorError {
    /// The session store could not be read or written.
    #[error("session store error: {0}")]
    Store(#[from] session_store::SessionStoreError),
}
