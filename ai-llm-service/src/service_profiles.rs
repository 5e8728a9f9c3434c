//! Shared model service with two profiles: `embedding` and `generation`.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - HTTP clients are built eagerly in [`LlmServiceProfiles::new`]; missing
//!   credentials are not a construction error and surface per call instead.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::LlmServiceProfiles;
//! use ai_llm_service::config::default_config::{config_gemini_generation, config_jina_embedding};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let svc = Arc::new(LlmServiceProfiles::new(
//!     config_jina_embedding()?,
//!     config_gemini_generation()?,
//! )?);
//!
//! let emb = svc.embed("Ferris").await?;
//! println!("Embedding dim = {}", emb.len());
//!
//! let txt = svc.generate("Say hello").await?;
//! println!("{txt}");
//! # Ok(()) }
//! ```

use async_trait::async_trait;

use crate::{
    config::llm_model_config::LlmModelConfig,
    error_handler::AiLlmError,
    services::{gemini_service::GeminiService, jina_service::JinaService},
};

/// Produces text for a fully assembled prompt.
///
/// The seam the chat pipeline depends on, so tests can inject scripted
/// outcomes without an HTTP server.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AiLlmError>;
}

/// Embedding + generation profiles behind one handle.
pub struct LlmServiceProfiles {
    embedding_cfg: LlmModelConfig,
    generation_cfg: LlmModelConfig,
    embedder: JinaService,
    generator: GeminiService,
}

impl LlmServiceProfiles {
    /// Creates the service from the two profile configs.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if a config targets the wrong provider, has an
    /// invalid endpoint, or an HTTP client cannot be built.
    pub fn new(
        embedding: LlmModelConfig,
        generation: LlmModelConfig,
    ) -> Result<Self, AiLlmError> {
        Ok(Self {
            embedder: JinaService::new(embedding.clone())?,
            generator: GeminiService::new(generation.clone())?,
            embedding_cfg: embedding,
            generation_cfg: generation,
        })
    }

    /// Computes an embedding with the **embedding** profile.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        self.embedder.embeddings(input).await
    }

    /// Computes embeddings for several inputs in one request.
    pub async fn embed_batch(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, AiLlmError> {
        self.embedder.embeddings_batch(inputs).await
    }

    /// Generates text with the **generation** profile.
    pub async fn generate(&self, prompt: &str) -> Result<String, AiLlmError> {
        self.generator.generate(prompt).await
    }

    /// Returns references to the current profiles `(embedding, generation)`.
    pub fn profiles(&self) -> (&LlmModelConfig, &LlmModelConfig) {
        (&self.embedding_cfg, &self.generation_cfg)
    }
}

#[async_trait]
impl TextGenerator for LlmServiceProfiles {
    async fn generate(&self, prompt: &str) -> Result<String, AiLlmError> {
        LlmServiceProfiles::generate(self, prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::llm_provider::LlmProvider;

    fn profile(provider: LlmProvider, model: &str) -> LlmModelConfig {
        LlmModelConfig {
            provider,
            model: model.into(),
            endpoint: "http://localhost:9".into(),
            api_key: None,
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: Some(1),
        }
    }

    #[test]
    fn builds_without_credentials() {
        let svc = LlmServiceProfiles::new(
            profile(LlmProvider::Jina, "jina-embeddings-v3"),
            profile(LlmProvider::Gemini, "gemini-1.5-flash-latest"),
        )
        .unwrap();
        let (emb, gen_cfg) = svc.profiles();
        assert_eq!(emb.model, "jina-embeddings-v3");
        assert_eq!(gen_cfg.provider, LlmProvider::Gemini);
    }

    #[test]
    fn swapped_profiles_are_rejected() {
        let res = LlmServiceProfiles::new(
            profile(LlmProvider::Gemini, "x"),
            profile(LlmProvider::Jina, "y"),
        );
        assert!(res.is_err());
    }

    #[tokio::test]
    async fn generator_trait_delegates() {
        let svc = LlmServiceProfiles::new(
            profile(LlmProvider::Jina, "e"),
            profile(LlmProvider::Gemini, "g"),
        )
        .unwrap();
        let generator: &dyn TextGenerator = &svc;
        let err = generator.generate("hi").await.unwrap_err();
        assert!(err.is_missing_api_key());
    }
}
