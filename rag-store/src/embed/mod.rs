use crate::errors::RagError;
use ai_llm_service::LlmServiceProfiles;
use async_trait::async_trait;

/// Provider interface for embedding generation.
///
/// Async because real providers perform HTTP requests. Implement this trait
/// to plug in another backend or a test double.
#[async_trait]
pub trait EmbeddingsProvider: Send + Sync {
    /// Embeds a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError>;

    /// Embeds many texts, preserving input order.
    ///
    /// The default calls [`embed`](Self::embed) sequentially.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        let mut out = Vec::with_capacity(texts.len());
        for t in texts {
            out.push(self.embed(t).await?);
        }
        Ok(out)
    }
}

#[async_trait]
impl EmbeddingsProvider for LlmServiceProfiles {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError> {
        Ok(LlmServiceProfiles::embed(self, text).await?)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        Ok(LlmServiceProfiles::embed_batch(self, texts).await?)
    }
}
