use rag_store::Passage;
use serde::{Deserialize, Serialize};

/// Request payload for /chat.
///
/// Both fields are optional at the serde level so a missing field becomes a
/// `BAD_REQUEST` body instead of a rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ChatRequest {
    /// Returns `(session_id, message)` when both are present and non-empty.
    ///
    /// Whitespace-only values count as present.
    pub fn required(&self) -> Option<(&str, &str)> {
        fn present(v: &Option<String>) -> Option<&str> {
            v.as_deref().filter(|s| !s.is_empty())
        }
        Some((present(&self.session_id)?, present(&self.message)?))
    }
}

/// Response payload for /chat.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    /// Passages used to build the prompt, best first.
    pub context: Vec<Passage>,
}
