//! Collaborator interfaces for model providers.
//!
//! The caches construct model instances through these traits on a miss.
//! Implementations live outside this crate (network clients to model
//! providers); tests supply in-memory fakes.

use crate::error::Result;
use std::sync::Arc;

/// A text embedding model instance.
pub trait Embedder: Send + Sync {
    /// Encodes a batch of documents into dense vectors.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying provider call fails.
    fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Encodes a single query into a dense vector.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying provider call fails.
    fn embed_query(&self, text: &str) -> Result<Vec<f32>>;
}

/// One scored entry returned by a rerank model.
#[derive(Debug, Clone, PartialEq)]
pub struct RerankResult {
    /// Index of the document in the submitted batch.
    pub index: usize,
    /// Text of the document as seen by the model.
    pub text: String,
    /// Relevance score assigned by the model.
    pub score: f64,
}

/// A cross-encoder rerank model instance.
pub trait RerankModel: Send + Sync {
    /// Scores every document of the batch against the query.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying provider call fails.
    fn invoke(
        &self,
        query: &str,
        docs: &[String],
        score_threshold: Option<f64>,
        top_n: Option<usize>,
        user: Option<&str>,
    ) -> Result<Vec<RerankResult>>;
}

/// Gateway to the external model provider registry.
///
/// Both methods are invoked from inside a cache miss, holding that cache's
/// lock; implementations may block on network I/O.
pub trait ModelManager: Send + Sync {
    /// Constructs a text-embedding model instance for the tenant.
    ///
    /// # Errors
    ///
    /// `Error::Unauthorized` when the tenant's credentials are rejected,
    /// `Error::ModelLoad` for any other failure.
    fn embedding_model(
        &self,
        tenant_id: &str,
        provider: &str,
        model: &str,
    ) -> Result<Arc<dyn Embedder>>;

    /// Constructs a rerank model instance for the tenant.
    ///
    /// # Errors
    ///
    /// `Error::Unauthorized` when the tenant's credentials are rejected,
    /// `Error::ModelLoad` for any other failure.
    fn rerank_model(
        &self,
        tenant_id: &str,
        provider: &str,
        model: &str,
    ) -> Result<Arc<dyn RerankModel>>;
}
