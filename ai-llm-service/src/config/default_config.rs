//! Default model configs loaded from environment variables.
//!
//! Called once at startup; the resulting [`LlmModelConfig`]s are handed to
//! [`crate::LlmServiceProfiles::new`] and never re-read.
//!
//! # Environment variables
//!
//! Embeddings (Jina):
//! - `JINA_API_KEY`     = credential (optional at startup)
//! - `JINA_URL`         = endpoint base (default `https://api.jina.ai`)
//! - `EMBEDDING_MODEL`  = model (default `jina-embeddings-v3`)
//!
//! Generation (Gemini):
//! - `GEMINI_API_KEY`   = credential (optional at startup)
//! - `GEMINI_URL`       = endpoint base (default `https://generativelanguage.googleapis.com`)
//! - `GEMINI_MODEL`     = model (default `gemini-1.5-flash-latest`)
//! - `LLM_MAX_TOKENS`   = optional max output tokens (u32)
//! - `GEMINI_TEMPERATURE` / `GEMINI_TOP_P` = optional sampling overrides (f32)
//!
//! Common:
//! - `LLM_TIMEOUT_SECS` = request timeout (u64, default 60)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, env_opt, env_opt_f32, env_opt_u32, env_opt_u64, env_or, validate_http_endpoint,
    },
};

pub const DEFAULT_JINA_URL: &str = "https://api.jina.ai";
pub const DEFAULT_EMBEDDING_MODEL: &str = "jina-embeddings-v3";
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash-latest";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Constructs the **embedding** profile (Jina).
///
/// # Defaults
/// - `temperature = None` (not applicable)
/// - `timeout_secs = LLM_TIMEOUT_SECS or 60`
///
/// # Errors
/// `ConfigError::InvalidFormat` if `JINA_URL` is not http(s),
/// `ConfigError::InvalidNumber` if `LLM_TIMEOUT_SECS` is not a u64.
pub fn config_jina_embedding() -> Result<LlmModelConfig, AiLlmError> {
    let endpoint = env_or("JINA_URL", DEFAULT_JINA_URL);
    validate_http_endpoint("JINA_URL", &endpoint)?;

    Ok(LlmModelConfig {
        provider: LlmProvider::Jina,
        model: env_or("EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL),
        endpoint,
        api_key: env_opt("JINA_API_KEY"),
        max_tokens: None,
        temperature: None,
        top_p: None,
        timeout_secs: Some(env_opt_u64("LLM_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS)),
    })
}

/// Constructs the **generation** profile (Gemini).
///
/// Sampling parameters are left to the model's defaults unless overridden.
///
/// # Errors
/// `ConfigError::InvalidFormat` if `GEMINI_URL` is not http(s),
/// `ConfigError::InvalidNumber` for malformed numeric variables.
pub fn config_gemini_generation() -> Result<LlmModelConfig, AiLlmError> {
    let endpoint = env_or("GEMINI_URL", DEFAULT_GEMINI_URL);
    validate_http_endpoint("GEMINI_URL", &endpoint)?;

    Ok(LlmModelConfig {
        provider: LlmProvider::Gemini,
        model: env_or("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
        endpoint,
        api_key: env_opt("GEMINI_API_KEY"),
        max_tokens: env_opt_u32("LLM_MAX_TOKENS")?,
        temperature: env_opt_f32("GEMINI_TEMPERATURE")?,
        top_p: env_opt_f32("GEMINI_TOP_P")?,
        timeout_secs: Some(env_opt_u64("LLM_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS)),
    })
}
