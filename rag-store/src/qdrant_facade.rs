//! Thin adapter around `qdrant-client`.
//!
//! All Qdrant calls go through [`QdrantFacade`] so the rest of the workspace
//! never touches the builder API directly.

use std::collections::HashMap;

use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointStruct, SearchParamsBuilder, SearchPoints,
    SearchPointsBuilder, UpsertPointsBuilder, Value as QValue, VectorParamsBuilder,
};
use tracing::{debug, info, warn};

use crate::config::{DistanceKind, RagConfig, VectorSpace};
use crate::errors::RagError;
use crate::record::Passage;
use crate::retrieve::VectorIndex;

/// Qdrant client bound to one collection.
pub struct QdrantFacade {
    client: Qdrant,
    collection: String,
    distance: DistanceKind,
    upsert_batch: usize,
    exact_search: bool,
}

impl QdrantFacade {
    /// Builds the client. No network traffic happens here.
    pub fn new(cfg: &RagConfig) -> Result<Self, RagError> {
        cfg.validate()?;

        let mut builder = Qdrant::from_url(&cfg.qdrant_url);
        if let Some(key) = &cfg.qdrant_api_key {
            builder = builder.api_key(key.clone());
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            collection: cfg.collection.clone(),
            distance: cfg.distance,
            upsert_batch: cfg.upsert_batch,
            exact_search: cfg.exact_search,
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Creates the collection if it does not exist yet.
    pub async fn ensure_collection(&self, space: &VectorSpace) -> Result<(), RagError> {
        if self.client.collection_exists(self.collection.as_str()).await? {
            debug!("collection '{}' already exists", self.collection);
            return Ok(());
        }
        warn!("collection '{}' not found, creating", self.collection);
        self.create_collection(space).await
    }

    /// Drops the collection (if present) and creates it again, empty.
    pub async fn recreate_collection(&self, space: &VectorSpace) -> Result<(), RagError> {
        if self.client.collection_exists(self.collection.as_str()).await? {
            info!("dropping collection '{}'", self.collection);
            self.client.delete_collection(self.collection.as_str()).await?;
        }
        self.create_collection(space).await
    }

    async fn create_collection(&self, space: &VectorSpace) -> Result<(), RagError> {
        let distance = match space.distance {
            DistanceKind::Cosine => Distance::Cosine,
            DistanceKind::Dot => Distance::Dot,
            DistanceKind::Euclid => Distance::Euclid,
        };

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(VectorParamsBuilder::new(space.size as u64, distance)),
            )
            .await?;

        info!(
            "collection '{}' created (size={}, distance={:?})",
            self.collection, space.size, space.distance
        );
        Ok(())
    }

    /// The distance configured for this facade.
    pub fn distance(&self) -> DistanceKind {
        self.distance
    }

    /// Upserts points in batches, waiting for each batch to be applied.
    ///
    /// Returns the number of points written.
    pub async fn upsert_points(&self, points: Vec<PointStruct>) -> Result<usize, RagError> {
        if points.is_empty() {
            debug!("no points to upsert");
            return Ok(0);
        }

        let total = points.len();
        let mut rest = points;
        while !rest.is_empty() {
            let tail = rest.split_off(rest.len().min(self.upsert_batch));
            let batch = std::mem::replace(&mut rest, tail);
            debug!("upserting batch of {} into '{}'", batch.len(), self.collection);
            self.client
                .upsert_points(UpsertPointsBuilder::new(&self.collection, batch).wait(true))
                .await?;
        }

        info!("upserted {} point(s) into '{}'", total, self.collection);
        Ok(total)
    }

    /// Payload-carrying search request; exact (full scan) when configured.
    fn search_request(&self, vector: Vec<f32>, top_k: u64) -> SearchPoints {
        let mut builder =
            SearchPointsBuilder::new(&self.collection, vector, top_k).with_payload(true);
        if self.exact_search {
            builder = builder.params(SearchParamsBuilder::default().exact(true));
        }
        builder.build()
    }
}

#[async_trait]
impl VectorIndex for QdrantFacade {
    async fn search(&self, vector: Vec<f32>, top_k: u64) -> Result<Vec<Passage>, RagError> {
        let res = self
            .client
            .search_points(self.search_request(vector, top_k))
            .await?;

        let out: Vec<Passage> = res
            .result
            .into_iter()
            .map(|p| Passage::from_payload(p.score, &qpayload_to_json(p.payload)))
            .collect();

        debug!("search in '{}' returned {} hit(s)", self.collection, out.len());
        Ok(out)
    }
}

/// Converts a Qdrant payload into JSON. Nested structs and lists map to `Null`.
fn qpayload_to_json(payload: HashMap<String, QValue>) -> serde_json::Value {
    use qdrant_client::qdrant::value::Kind as K;

    let m = payload
        .into_iter()
        .map(|(k, v)| {
            let j = match v.kind {
                Some(K::StringValue(s)) => serde_json::Value::String(s),
                Some(K::IntegerValue(i)) => serde_json::Value::Number(i.into()),
                Some(K::DoubleValue(f)) => serde_json::json!(f),
                Some(K::BoolValue(b)) => serde_json::Value::Bool(b),
                _ => serde_json::Value::Null,
            };
            (k, j)
        })
        .collect();
    serde_json::Value::Object(m)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_conversion_keeps_scalars() {
        let mut p = HashMap::new();
        p.insert("title".to_string(), QValue::from("Rates"));
        p.insert("year".to_string(), QValue::from(2024_i64));
        let j = qpayload_to_json(p);
        assert_eq!(j["title"], "Rates");
        assert_eq!(j["year"], 2024);
    }

    #[test]
    fn new_rejects_invalid_config() {
        let cfg = RagConfig::new_default("", "news_articles");
        assert!(matches!(QdrantFacade::new(&cfg), Err(RagError::Config(_))));
    }

    #[tokio::test]
    async fn exact_flag_reaches_the_search_request() {
        let mut cfg = RagConfig::new_default("http://localhost:6334", "news_articles");
        let ann = QdrantFacade::new(&cfg).unwrap().search_request(vec![0.1, 0.2], 4);
        assert!(ann.params.is_none());
        assert_eq!(ann.limit, 4);

        cfg.exact_search = true;
        let exact = QdrantFacade::new(&cfg).unwrap().search_request(vec![0.1, 0.2], 4);
        assert_eq!(exact.params.and_then(|p| p.exact), Some(true));
        assert!(exact.with_payload.is_some());
    }
}
