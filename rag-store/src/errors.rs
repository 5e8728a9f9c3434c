//! Unified error types for the crate.

use thiserror::Error;

/// Top-level error for rag-store operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// I/O or filesystem errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing / serialization errors.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Mismatch in vector dimensionality across records.
    #[error("vector size mismatch: got {got}, want {want}")]
    VectorSizeMismatch { got: usize, want: usize },

    /// The embedding provider failed (missing credential, HTTP error, decode).
    #[error("embedding error: {0}")]
    Embedding(String),

    /// A feed could not be downloaded.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// A feed document could not be parsed.
    #[error("feed error: {0}")]
    Feed(String),

    /// Qdrant client errors (wrapped).
    #[error("qdrant error: {0}")]
    Qdrant(String),
}

impl From<ai_llm_service::AiLlmError> for RagError {
    fn from(err: ai_llm_service::AiLlmError) -> Self {
        RagError::Embedding(err.to_string())
    }
}

impl From<qdrant_client::QdrantError> for RagError {
    fn from(err: qdrant_client::QdrantError) -> Self {
        RagError::Qdrant(err.to_string())
    }
}

impl From<feed_rs::parser::ParseFeedError> for RagError {
    fn from(err: feed_rs::parser::ParseFeedError) -> Self {
        RagError::Feed(err.to_string())
    }
}
