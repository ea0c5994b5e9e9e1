//! Rerank runners for retrieval post-processing.
//!
//! Two strategies re-score candidate documents: a cross-encoder rerank
//! model scoring `(query, document)` pairs, and a weighted fusion of
//! keyword and embedding similarity. Both resolve their model instances
//! through process-wide TTL + LRU caches.

use crate::document::Document;
use crate::error::{Error, Result};
use std::str::FromStr;

pub mod keyword;
mod model_runner;
mod reorder;
mod weight;

pub use model_runner::{
    cached_rerank_model, rerank_model_cache, RerankModelRunner, RerankingModelConfig,
};
pub use reorder::ReorderRunner;
pub use weight::{weight_embedding_cache, KeywordSetting, VectorSetting, WeightRerankRunner, Weights};



/// Rerank strategy selected per dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RerankMode {
    /// Cross-encoder rerank model.
    RerankingModel,
    /// Weighted fusion of keyword and vector similarity.
    WeightedScore,
}

impl RerankMode {
    /// Canonical tag for this mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RerankingModel => "reranking_model",
            Self::WeightedScore => "weighted_score",
        }
    }
}

impl FromStr for RerankMode {
    type Err = Error;

    fn from_str(tag: &str) -> Result<Self> {
        match tag {
            "reranking_model" => Ok(Self::RerankingModel),
            "weighted_score" => Ok(Self::WeightedScore),
            other => Err(Error::Config(format!("unknown reranking mode '{other}'"))),
        }
    }
}

/// A rerank strategy applied to one request's candidate documents.
pub trait RerankRunner: Send + Sync {
    /// Re-scores the documents against the query.
    ///
    /// Documents arrive already deduplicated from the retrieval service.
    /// The returned list is sorted by descending `metadata["score"]`,
    /// filtered by `score_threshold` and truncated to `top_n` when given.
    ///
    /// # Errors
    ///
    /// Returns an error if a model invocation fails.
    fn run(
        &self,
        query: &str,
        documents: Vec<Document>,
        score_threshold: Option<f64>,
        top_n: Option<usize>,
        user: Option<&str>,
    ) -> Result<Vec<Document>>;
}

/// Sorts documents by descending metadata score; missing scores sort last.
pub(crate) fn sort_by_score_desc(documents: &mut [Document]) {
    documents.sort_by(|a, b| {
        b.score()
            .unwrap_or(0.0)
            .total_cmp(&a.score().unwrap_or(0.0))
    });
}
