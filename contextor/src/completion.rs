//! Fail-closed completion: every provider outcome becomes a displayable reply.

use ai_llm_service::{AiLlmError, ProviderErrorKind, TextGenerator};
use tracing::{debug, warn};

pub const MISSING_KEY_REPLY: &str = "GEMINI_API_KEY not set in backend env";
pub const RATE_LIMITED_REPLY: &str = "Rate limit reached. Please wait.";
pub const OVERLOADED_REPLY: &str = "Gemini API overloaded. Please retry later.";
pub const EMPTY_REPLY: &str = "No reply";

/// Result of the completion stage.
///
/// `Substituted` replies are shown to the user like answers but must not be
/// treated as model output by anything downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Answered(String),
    Substituted { reply: String, cause: String },
}

impl Completion {
    pub fn reply(&self) -> &str {
        match self {
            Completion::Answered(text) => text,
            Completion::Substituted { reply, .. } => reply,
        }
    }

    pub fn into_reply(self) -> String {
        match self {
            Completion::Answered(text) => text,
            Completion::Substituted { reply, .. } => reply,
        }
    }

    pub fn is_substituted(&self) -> bool {
        matches!(self, Completion::Substituted { .. })
    }
}

/// User-facing text for a failed completion.
pub fn substitute_reply(err: &AiLlmError) -> String {
    if err.is_missing_api_key() {
        return MISSING_KEY_REPLY.to_string();
    }
    if let AiLlmError::Provider(p) = err {
        match &p.kind {
            ProviderErrorKind::EmptyChoices => return EMPTY_REPLY.to_string(),
            ProviderErrorKind::HttpStatus(http) => {
                return match http.status.as_u16() {
                    429 => RATE_LIMITED_REPLY.to_string(),
                    503 => OVERLOADED_REPLY.to_string(),
                    _ => format!("Error calling Gemini: {}", http.snippet),
                };
            }
            _ => {}
        }
    }
    match err.http_status().map(|s| s.as_u16()) {
        Some(429) => RATE_LIMITED_REPLY.to_string(),
        Some(503) => OVERLOADED_REPLY.to_string(),
        _ => format!("Error calling Gemini: {err}"),
    }
}

/// Runs the generator and absorbs any failure into a substitute reply.
pub async fn complete(generator: &dyn TextGenerator, prompt: &str) -> Completion {
    match generator.generate(prompt).await {
        Ok(text) if !text.trim().is_empty() => {
            debug!("completion: {} chars", text.len());
            Completion::Answered(text)
        }
        Ok(_) => {
            warn!("completion: provider returned blank text");
            Completion::Substituted {
                reply: EMPTY_REPLY.to_string(),
                cause: "blank completion".to_string(),
            }
        }
        Err(err) => {
            warn!("completion failed, substituting reply: {err}");
            Completion::Substituted {
                reply: substitute_reply(&err),
                cause: err.to_string(),
            }
        }
    }
}
