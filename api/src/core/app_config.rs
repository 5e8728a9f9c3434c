//! Process configuration, read once from the environment at startup.
//!
//! Every component gets its slice through a constructor; nothing below this
//! layer reads the environment while serving requests.

use ai_llm_service::LlmModelConfig;
use ai_llm_service::config::default_config::{config_gemini_generation, config_jina_embedding};
use ai_llm_service::error_handler::{env_opt_u16, must_env};
use rag_store::RagConfig;
use session_store::SessionStoreConfig;

use crate::error_handler::AppError;

pub const DEFAULT_PORT: u16 = 4000;

/// Immutable configuration for the whole backend.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Listen port; the server binds `0.0.0.0:{port}`.
    pub port: u16,
    pub session: SessionStoreConfig,
    pub rag: RagConfig,
    pub embedding: LlmModelConfig,
    pub generation: LlmModelConfig,
}

impl AppConfig {
    /// Loads `PORT`, `REDIS_URL` (required), the Qdrant settings and both
    /// model profiles.
    ///
    /// # Errors
    /// [`AppError::MissingEnv`] when `REDIS_URL` is absent, [`AppError::Config`]
    /// for malformed values.
    pub fn from_env() -> Result<Self, AppError> {
        let redis_url = must_env("REDIS_URL").map_err(|_| AppError::MissingEnv("REDIS_URL"))?;
        let port = env_opt_u16("PORT")
            .map_err(|e| AppError::Config(e.to_string()))?
            .unwrap_or(DEFAULT_PORT);

        let session = SessionStoreConfig::from_url(redis_url);
        session
            .validate()
            .map_err(|e| AppError::Config(e.to_string()))?;

        let rag = RagConfig::from_env().map_err(|e| AppError::Config(e.to_string()))?;
        let embedding = config_jina_embedding().map_err(|e| AppError::Config(e.to_string()))?;
        let generation =
            config_gemini_generation().map_err(|e| AppError::Config(e.to_string()))?;

        Ok(Self {
            port,
            session,
            rag,
            embedding,
            generation,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
