//! Hosted model access for the chat backend.
//!
//! Two profiles are managed by [`service_profiles::LlmServiceProfiles`]:
//! - **embedding** → Jina `/v1/embeddings`
//! - **generation** → Gemini `:generateContent`
//!
//! Every failure is returned as [`error_handler::AiLlmError`]; callers decide
//! how to degrade.

pub mod config {
    pub mod default_config;
    pub mod llm_model_config;
    pub mod llm_provider;
}

pub mod services {
    pub mod gemini_service;
    pub mod jina_service;
}

pub mod error_handler;
pub mod service_profiles;

pub use config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
pub use error_handler::{AiLlmError, ConfigError, HttpError, Provider, ProviderError, ProviderErrorKind};
pub use service_profiles::{LlmServiceProfiles, TextGenerator};
