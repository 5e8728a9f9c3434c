use std::sync::Arc;

use ai_llm_service::LlmServiceProfiles;
use contextor::ChatPipeline;
use rag_store::{QdrantFacade, Retriever};
use session_store::RedisSessionStore;
use tracing::info;

use crate::core::app_config::AppConfig;
use crate::error_handler::AppError;

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ChatPipeline>,
}

impl AppState {
    pub fn new(pipeline: ChatPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }

    /// Wires the production components: Redis sessions, Jina + Gemini, Qdrant.
    ///
    /// No network calls happen here; unreachable services show up per request.
    pub fn from_config(cfg: &AppConfig) -> Result<Self, AppError> {
        let store = RedisSessionStore::new(&cfg.session)
            .map_err(|e| AppError::Config(e.to_string()))?;

        let llm = Arc::new(
            LlmServiceProfiles::new(cfg.embedding.clone(), cfg.generation.clone())
                .map_err(|e| AppError::Config(e.to_string()))?,
        );

        let index = QdrantFacade::new(&cfg.rag).map_err(|e| AppError::Config(e.to_string()))?;
        let retriever = Retriever::new(llm.clone(), Arc::new(index), cfg.rag.default_top_k);

        info!(
            tls = cfg.session.tls,
            collection = %cfg.rag.collection,
            top_k = cfg.rag.default_top_k,
            embedding_model = %cfg.embedding.model,
            generation_model = %cfg.generation.model,
            "components ready"
        );

        Ok(Self::new(ChatPipeline::new(Arc::new(store), retriever, llm)))
    }
}
