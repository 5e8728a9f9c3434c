use crate::config::llm_provider::LlmProvider;

/// Configuration for one model profile.
///
/// # Fields
///
/// - `provider`: Which backend serves the profile.
/// - `model`: Model identifier (e.g. `"jina-embeddings-v3"`, `"gemini-1.5-flash-latest"`).
/// - `endpoint`: API base URL without a trailing path.
/// - `api_key`: Credential. `None` is allowed at startup; calls then fail
///   with `MissingApiKey` instead of reaching the network.
/// - `max_tokens`: Maximum number of tokens to generate (if supported).
/// - `temperature`: Sampling temperature.
/// - `top_p`: Nucleus sampling cutoff.
/// - `timeout_secs`: Request timeout in seconds (default 60).
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    pub provider: LlmProvider,
    pub model: String,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub timeout_secs: Option<u64>,
}
