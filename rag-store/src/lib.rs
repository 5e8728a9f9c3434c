//! Passage retrieval and ingestion over Qdrant.
//!
//! This crate provides:
//! - [`Retriever`]: embed a query, search the collection, return ranked [`Passage`]s
//! - [`ingest`]: embed articles and upsert them as points
//! - [`feeds`]: collect articles from RSS/Atom feeds for ingestion
//!
//! Embedding and vector search sit behind the [`EmbeddingsProvider`] and
//! [`VectorIndex`] traits; [`QdrantFacade`] is the production index.

mod config;
mod embed;
mod errors;
pub mod feeds;
pub mod ingest;
mod qdrant_facade;
mod record;
mod retrieve;

pub use config::{DEFAULT_TOP_K, DistanceKind, RagConfig, VectorSpace, parse_top_k};
pub use embed::EmbeddingsProvider;
pub use errors::RagError;
pub use qdrant_facade::QdrantFacade;
pub use record::{Article, Passage};
pub use retrieve::{Retriever, VectorIndex};
