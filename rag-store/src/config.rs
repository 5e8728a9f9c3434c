//! Runtime and collection configuration.

use ai_llm_service::error_handler::{env_opt, env_opt_bool, env_or};

use crate::errors::RagError;

/// Passages retrieved per chat turn when nothing else is configured.
pub const DEFAULT_TOP_K: u64 = 4;

/// Distance function used for the vector space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DistanceKind {
    /// Cosine distance (recommended for most embeddings).
    Cosine,
    /// Dot product (useful for normalized vectors).
    Dot,
    /// Euclidean distance (L2).
    Euclid,
}

impl DistanceKind {
    /// Parses a case-insensitive name; unknown values fall back to Cosine.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "dot" | "dotproduct" => DistanceKind::Dot,
            "euclid" | "l2" => DistanceKind::Euclid,
            _ => DistanceKind::Cosine,
        }
    }
}

/// Describes the vector space of the collection.
#[derive(Clone, Debug)]
pub struct VectorSpace {
    /// Dimensionality of vectors.
    pub size: usize,
    /// Distance function.
    pub distance: DistanceKind,
}

/// Configuration for retrieval and ingestion.
#[derive(Clone, Debug)]
pub struct RagConfig {
    /// Qdrant endpoint, e.g. `http://localhost:6334`.
    pub qdrant_url: String,
    /// Optional API key for Qdrant Cloud.
    pub qdrant_api_key: Option<String>,
    /// Target collection name.
    pub collection: String,
    /// Distance function (Cosine by default).
    pub distance: DistanceKind,
    /// Upsert batch size.
    pub upsert_batch: usize,
    /// Exact search flag (false = HNSW ANN).
    pub exact_search: bool,
    /// Passages per query when the caller does not ask for a specific count.
    pub default_top_k: u64,
}

impl RagConfig {
    /// Creates a sane default config for a given collection name and Qdrant endpoint.
    pub fn new_default(url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            qdrant_url: url.into(),
            qdrant_api_key: None,
            collection: collection.into(),
            distance: DistanceKind::Cosine,
            upsert_batch: 256,
            exact_search: false,
            default_top_k: DEFAULT_TOP_K,
        }
    }

    /// Reads settings from the environment.
    ///
    /// - `QDRANT_URL` (default: `http://localhost:6334`)
    /// - `QDRANT_COLLECTION` (default: `news_articles`)
    /// - `QDRANT_API_KEY` (optional)
    /// - `QDRANT_DISTANCE` (`Cosine` | `Dot` | `Euclid`; default Cosine)
    /// - `QDRANT_EXACT` (boolean; default false = HNSW search)
    /// - `TOP_K` (default 4; non-numeric or zero falls back to 4)
    pub fn from_env() -> Result<Self, RagError> {
        let mut cfg = Self::new_default(
            env_or("QDRANT_URL", "http://localhost:6334"),
            env_or("QDRANT_COLLECTION", "news_articles"),
        );
        cfg.qdrant_api_key = env_opt("QDRANT_API_KEY");
        if let Some(d) = env_opt("QDRANT_DISTANCE") {
            cfg.distance = DistanceKind::parse(&d);
        }
        cfg.exact_search = env_opt_bool("QDRANT_EXACT")
            .map_err(|e| RagError::Config(e.to_string()))?
            .unwrap_or(false);
        cfg.default_top_k = parse_top_k(env_opt("TOP_K").as_deref());

        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), RagError> {
        if self.qdrant_url.trim().is_empty() {
            return Err(RagError::Config("qdrant_url is empty".into()));
        }
        if self.collection.trim().is_empty() {
            return Err(RagError::Config("collection is empty".into()));
        }
        if self.upsert_batch == 0 {
            return Err(RagError::Config("upsert_batch must be > 0".into()));
        }
        if self.default_top_k == 0 {
            return Err(RagError::Config("default_top_k must be > 0".into()));
        }
        Ok(())
    }
}

/// Parses a top-K setting; anything that is not a positive integer yields [`DEFAULT_TOP_K`].
pub fn parse_top_k(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|k| *k > 0)
        .unwrap_or(DEFAULT_TOP_K)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_k_defaults_on_bad_input() {
        assert_eq!(parse_top_k(None), 4);
        assert_eq!(parse_top_k(Some("abc")), 4);
        assert_eq!(parse_top_k(Some("0")), 4);
        assert_eq!(parse_top_k(Some("-3")), 4);
        assert_eq!(parse_top_k(Some(" 7 ")), 7);
    }

    #[test]
    fn distance_parsing_is_lenient() {
        assert_eq!(DistanceKind::parse("DOT"), DistanceKind::Dot);
        assert_eq!(DistanceKind::parse("l2"), DistanceKind::Euclid);
        assert_eq!(DistanceKind::parse("whatever"), DistanceKind::Cosine);
    }

    #[test]
    fn empty_collection_is_invalid() {
        let cfg = RagConfig::new_default("http://localhost:6334", " ");
        assert!(matches!(cfg.validate(), Err(RagError::Config(_))));
    }
}
