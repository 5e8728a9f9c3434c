//! Query-time retrieval: embed the question, search the index, rank passages.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::embed::EmbeddingsProvider;
use crate::errors::RagError;
use crate::record::Passage;

/// Nearest-neighbour search over stored passages.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Returns at most `top_k` passages, best match first.
    async fn search(&self, vector: Vec<f32>, top_k: u64) -> Result<Vec<Passage>, RagError>;
}

/// Embeds a query and looks up the closest passages.
#[derive(Clone)]
pub struct Retriever {
    embedder: Arc<dyn EmbeddingsProvider>,
    index: Arc<dyn VectorIndex>,
    default_top_k: u64,
}

impl Retriever {
    pub fn new(
        embedder: Arc<dyn EmbeddingsProvider>,
        index: Arc<dyn VectorIndex>,
        default_top_k: u64,
    ) -> Self {
        Self {
            embedder,
            index,
            default_top_k: default_top_k.max(1),
        }
    }

    /// Retrieves up to `top_k` passages (or the configured default) for `query`.
    ///
    /// Order is the index's order (descending score). An empty result is not an
    /// error; embedding or search failures are.
    pub async fn retrieve(&self, query: &str, top_k: Option<u64>) -> Result<Vec<Passage>, RagError> {
        let k = top_k.filter(|k| *k > 0).unwrap_or(self.default_top_k);
        debug!("retrieve: embedding query ({} chars), top_k={}", query.chars().count(), k);

        let vector = self.embedder.embed(query).await?;
        let mut hits = self.index.search(vector, k).await?;
        hits.truncate(k as usize);

        info!("retrieve: {} passage(s)", hits.len());
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct FixedEmbedder;

    #[async_trait]
    impl EmbeddingsProvider for FixedEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, RagError> {
            Ok(vec![0.1, 0.2, 0.3])
        }
    }

    struct BrokenEmbedder;

    #[async_trait]
    impl EmbeddingsProvider for BrokenEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, RagError> {
            Err(RagError::Embedding("missing api key".into()))
        }
    }

    /// Returns `hits` regardless of `top_k` and records the requested limit.
    struct StaticIndex {
        hits: Vec<Passage>,
        seen_k: Mutex<Option<u64>>,
    }

    impl StaticIndex {
        fn new(n: usize) -> Self {
            let hits = (0..n)
                .map(|i| Passage {
                    score: 1.0 - i as f32 * 0.1,
                    text: Some(format!("p{i}")),
                    title: None,
                    url: None,
                })
                .collect();
            Self { hits, seen_k: Mutex::new(None) }
        }
    }

    #[async_trait]
    impl VectorIndex for StaticIndex {
        async fn search(&self, _vector: Vec<f32>, top_k: u64) -> Result<Vec<Passage>, RagError> {
            *self.seen_k.lock().unwrap() = Some(top_k);
            Ok(self.hits.clone())
        }
    }

    #[tokio::test]
    async fn caps_results_at_top_k_and_keeps_order() {
        let index = Arc::new(StaticIndex::new(6));
        let r = Retriever::new(Arc::new(FixedEmbedder), index.clone(), 4);

        let hits = r.retrieve("rates?", None).await.unwrap();
        assert_eq!(hits.len(), 4);
        assert_eq!(hits[0].text.as_deref(), Some("p0"));
        assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(*index.seen_k.lock().unwrap(), Some(4));
    }

    #[tokio::test]
    async fn explicit_top_k_overrides_default_and_zero_does_not() {
        let index = Arc::new(StaticIndex::new(6));
        let r = Retriever::new(Arc::new(FixedEmbedder), index.clone(), 4);

        assert_eq!(r.retrieve("q", Some(2)).await.unwrap().len(), 2);
        assert_eq!(r.retrieve("q", Some(0)).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn empty_index_is_not_an_error() {
        let r = Retriever::new(Arc::new(FixedEmbedder), Arc::new(StaticIndex::new(0)), 4);
        assert!(r.retrieve("q", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn embedding_failure_propagates() {
        let r = Retriever::new(Arc::new(BrokenEmbedder), Arc::new(StaticIndex::new(3)), 4);
        let err = r.retrieve("q", None).await.unwrap_err();
        assert!(matches!(err, RagError::Embedding(_)));
    }
}
