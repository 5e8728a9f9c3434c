//! Article ingestion: read a JSON array → embed → (re)create collection → upsert.
//!
//! Each article with non-empty text becomes one point. The point id is the
//! article's index in the input file, so re-ingesting the same file overwrites
//! instead of duplicating. Payload carries `title`, `url` and a truncated `text`.

use std::collections::HashMap;
use std::path::Path;

use futures::{StreamExt, TryStreamExt, stream};
use indicatif::{ProgressBar, ProgressStyle};
use qdrant_client::qdrant::{PointStruct, Value as QValue};
use tracing::{debug, info, warn};

use crate::config::VectorSpace;
use crate::embed::EmbeddingsProvider;
use crate::errors::RagError;
use crate::qdrant_facade::QdrantFacade;
use crate::record::Article;

/// Knobs for [`ingest_articles`].
#[derive(Clone, Debug)]
pub struct IngestOptions {
    /// Drop and recreate the collection before upserting.
    pub recreate: bool,
    /// Characters of article text sent to the embedder.
    pub max_text_chars: usize,
    /// Characters of article text stored in the payload.
    pub payload_chars: usize,
    /// Texts per embedding request.
    pub embed_batch: usize,
    /// Embedding requests in flight.
    pub concurrency: usize,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            recreate: false,
            max_text_chars: 1000,
            payload_chars: 400,
            embed_batch: 16,
            concurrency: 2,
        }
    }
}

/// Outcome of one ingestion run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IngestReport {
    pub upserted: usize,
    pub skipped: usize,
    pub dimension: usize,
}

/// Reads a JSON array of articles from disk.
pub fn load_articles(path: impl AsRef<Path>) -> Result<Vec<Article>, RagError> {
    let raw = std::fs::read_to_string(path.as_ref())?;
    let articles: Vec<Article> = serde_json::from_str(&raw)?;
    debug!("loaded {} article(s) from {:?}", articles.len(), path.as_ref());
    Ok(articles)
}

/// First `max` characters of `s` (char-boundary safe).
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Embeds all usable articles and upserts them into the facade's collection.
///
/// Articles with blank text are skipped. Any embedding failure aborts the run
/// before the collection is touched.
pub async fn ingest_articles(
    facade: &QdrantFacade,
    embedder: &dyn EmbeddingsProvider,
    articles: &[Article],
    opts: &IngestOptions,
) -> Result<IngestReport, RagError> {
    let usable: Vec<(u64, &Article)> = articles
        .iter()
        .enumerate()
        .filter(|(_, a)| !a.text.trim().is_empty())
        .map(|(i, a)| (i as u64, a))
        .collect();
    let skipped = articles.len() - usable.len();
    if skipped > 0 {
        warn!("skipping {} article(s) with empty text", skipped);
    }
    if usable.is_empty() {
        info!("nothing to ingest");
        return Ok(IngestReport { upserted: 0, skipped, dimension: 0 });
    }

    let texts: Vec<String> = usable
        .iter()
        .map(|(_, a)| truncate_chars(&a.text, opts.max_text_chars))
        .collect();
    let vectors = embed_all(embedder, &texts, opts).await?;

    let dimension = vectors.first().map(Vec::len).unwrap_or(0);
    let points = build_points(&usable, vectors, opts.payload_chars)?;

    let space = VectorSpace { size: dimension, distance: facade.distance() };
    if opts.recreate {
        facade.recreate_collection(&space).await?;
    } else {
        facade.ensure_collection(&space).await?;
    }

    let upserted = facade.upsert_points(points).await?;
    info!(
        "ingested {} article(s) into '{}' (dim={}, skipped={})",
        upserted,
        facade.collection(),
        dimension,
        skipped
    );
    Ok(IngestReport { upserted, skipped, dimension })
}

/// Embeds texts in ordered, bounded-concurrency batches.
async fn embed_all(
    embedder: &dyn EmbeddingsProvider,
    texts: &[String],
    opts: &IngestOptions,
) -> Result<Vec<Vec<f32>>, RagError> {
    let batch = opts.embed_batch.max(1);
    let pb = ProgressBar::new(texts.len() as u64);
    if let Ok(style) =
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} embedded")
    {
        pb.set_style(style.progress_chars("##-"));
    }

    let chunks: Vec<Vec<Vec<f32>>> = stream::iter(texts.chunks(batch))
        .map(|chunk| {
            let pb = pb.clone();
            async move {
                let out = embedder.embed_batch(chunk).await?;
                pb.inc(chunk.len() as u64);
                Ok::<_, RagError>(out)
            }
        })
        .buffered(opts.concurrency.max(1))
        .try_collect()
        .await?;

    pb.finish_and_clear();
    Ok(chunks.into_iter().flatten().collect())
}

/// Pairs articles with their vectors. All vectors must share one dimension.
pub fn build_points(
    items: &[(u64, &Article)],
    vectors: Vec<Vec<f32>>,
    payload_chars: usize,
) -> Result<Vec<PointStruct>, RagError> {
    if items.len() != vectors.len() {
        return Err(RagError::Embedding(format!(
            "expected {} embeddings, got {}",
            items.len(),
            vectors.len()
        )));
    }

    let want = vectors.first().map(Vec::len).unwrap_or(0);
    if want == 0 {
        return Err(RagError::Embedding("embedding provider returned empty vectors".into()));
    }

    items
        .iter()
        .zip(vectors)
        .map(|((id, article), vector)| {
            if vector.len() != want {
                return Err(RagError::VectorSizeMismatch { got: vector.len(), want });
            }
            let mut payload: HashMap<String, QValue> = HashMap::new();
            payload.insert("title".into(), QValue::from(article.title.clone().unwrap_or_default()));
            payload.insert("url".into(), QValue::from(article.url.clone().unwrap_or_default()));
            payload.insert("text".into(), QValue::from(truncate_chars(&article.text, payload_chars)));
            Ok(PointStruct::new(*id, vector, payload))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use qdrant_client::qdrant::point_id::PointIdOptions;
    use qdrant_client::qdrant::value::Kind;

    fn article(title: &str, text: &str) -> Article {
        Article {
            id: None,
            title: Some(title.into()),
            url: Some(format!("https://news.test/{title}")),
            text: text.into(),
        }
    }

    fn str_of<'a>(p: &'a PointStruct, key: &str) -> &'a str {
        match p.payload.get(key).and_then(|v| v.kind.as_ref()) {
            Some(Kind::StringValue(s)) => s,
            _ => panic!("payload field {key} is not a string"),
        }
    }

    #[test]
    fn truncation_counts_chars_not_bytes() {
        assert_eq!(truncate_chars("héllo wörld", 4), "héll");
        assert_eq!(truncate_chars("ab", 10), "ab");
    }

    #[test]
    fn points_carry_index_ids_and_truncated_payload() {
        let long = "x".repeat(900);
        let a = article("a", &long);
        let b = article("b", "short body");
        let items = vec![(0_u64, &a), (2_u64, &b)];

        let points = build_points(&items, vec![vec![0.1; 3], vec![0.2; 3]], 400).unwrap();
        assert_eq!(points.len(), 2);

        let ids: Vec<u64> = points
            .iter()
            .map(|p| match p.id.as_ref().and_then(|id| id.point_id_options.as_ref()) {
                Some(PointIdOptions::Num(n)) => *n,
                _ => panic!("expected numeric id"),
            })
            .collect();
        assert_eq!(ids, vec![0, 2]);

        assert_eq!(str_of(&points[0], "text").chars().count(), 400);
        assert_eq!(str_of(&points[1], "title"), "b");
        assert_eq!(str_of(&points[1], "url"), "https://news.test/b");
    }

    #[test]
    fn mixed_dimensions_are_rejected() {
        let a = article("a", "one");
        let b = article("b", "two");
        let items = vec![(0_u64, &a), (1_u64, &b)];
        let err = build_points(&items, vec![vec![0.1; 3], vec![0.1; 4]], 400).unwrap_err();
        assert!(matches!(err, RagError::VectorSizeMismatch { got: 4, want: 3 }));
    }

    #[test]
    fn count_mismatch_is_an_embedding_error() {
        let a = article("a", "one");
        let err = build_points(&[(0, &a)], vec![], 400).unwrap_err();
        assert!(matches!(err, RagError::Embedding(_)));
    }

    #[test]
    fn load_articles_reads_json_array() {
        let dir = std::env::temp_dir().join(format!("rag-store-ingest-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("articles.json");
        std::fs::write(&path, r#"[{"title":"T","text":"body"},{"text":""}]"#).unwrap();

        let articles = load_articles(&path).unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title.as_deref(), Some("T"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn load_articles_rejects_non_array() {
        let dir = std::env::temp_dir().join(format!("rag-store-ingest-bad-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("articles.json");
        std::fs::write(&path, r#"{"text":"body"}"#).unwrap();

        assert!(matches!(load_articles(&path), Err(RagError::Parse(_))));
        std::fs::remove_dir_all(&dir).ok();
    }
}
