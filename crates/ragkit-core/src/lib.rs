//! # `RagKit` Core
//!
//! Instance caching and post-processing engine for Retrieval-Augmented
//! Generation pipelines.
//!
//! Three expensive objects sit in front of every post-processing request:
//! embedding model instances, vector store processor handles, and rerank
//! model instances. Each is kept in a process-wide cache with bounded
//! size, TTL expiration and LRU eviction, loaded at most once per key per
//! race window. On top of the caches sit the consumers: a post-processor
//! selecting a rerank strategy per request, and the runners scoring
//! candidate documents.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ragkit_core::{DataPostProcessor, Document};
//!
//! let processor = DataPostProcessor::new(
//!     model_manager,
//!     "tenant-1",
//!     "weighted_score",
//!     None,
//!     Some(weights),
//!     false,
//! )?;
//!
//! let reranked = processor.invoke("query", documents, Some(0.5), Some(10), None)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod config;
pub mod dataset;
pub mod document;
pub mod embedding;
pub mod model;
pub mod post_processor;
pub mod rerank;
pub mod vector;

mod error;

#[cfg(test)]
mod test_support;

pub use cache::{CacheMonitor, CacheSnapshot, CacheStats, TtlLruCache};
pub use config::VectorStoreConfig;
pub use dataset::Dataset;
pub use document::Document;
pub use error::{Error, Result};
pub use post_processor::DataPostProcessor;
pub use rerank::{RerankMode, RerankRunner, RerankingModelConfig, Weights};
pub use vector::{VectorBackend, VectorProcessor, VectorStore};

/// Snapshots of every process-wide instance cache, for monitoring.
#[must_use]
pub fn cache_snapshots() -> Vec<CacheSnapshot> {
    vec![
        embedding::embedding_cache().snapshot(),
        vector::processor_cache().snapshot(),
        rerank::rerank_model_cache().snapshot(),
        rerank::weight_embedding_cache().snapshot(),
    ]
}
