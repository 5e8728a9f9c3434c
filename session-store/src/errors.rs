//! Unified error type for the session store.

use thiserror::Error;

/// Errors produced by [`crate::SessionStore`] implementations.
#[derive(Debug, Error)]
pub enum SessionStoreError {
    /// The underlying key-value store could not be reached or rejected the command.
    #[error("session store unavailable: {0}")]
    Unavailable(String),

    /// A stored turn could not be encoded or decoded.
    #[error("turn serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid connection settings.
    #[error("session store config error: {0}")]
    Config(String),
}

impl From<redis::RedisError> for SessionStoreError {
    fn from(err: redis::RedisError) -> Self {
        SessionStoreError::Unavailable(err.to_string())
    }
}
