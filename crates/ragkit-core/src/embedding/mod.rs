//! Cached embedding model instances.
//!
//! Embedding models are expensive to construct (credential resolution plus
//! provider handshake), so loaded instances are kept in a process-wide
//! TTL + LRU cache keyed by tenant, provider and model name. What is cached
//! is the [`CachedEmbedder`] decorator, not the raw provider handle, so the
//! wrapping cost stays off the hot path.

use crate::cache::{key, TtlLruCache};
use crate::error::Result;
use crate::model::{Embedder, ModelManager};
use once_cell::sync::Lazy;
use std::sync::Arc;
use std::time::Duration;

/// TTL for cached embedding model instances.
const EMBEDDING_CACHE_TTL: Duration = Duration::from_secs(1800);
/// Maximum number of cached embedding model instances.
const EMBEDDING_CACHE_MAX_SIZE: usize = 100;

static EMBEDDING_CACHE: Lazy<TtlLruCache<String, Arc<CachedEmbedder>>> =
    Lazy::new(|| TtlLruCache::new("embedding_model", EMBEDDING_CACHE_TTL, EMBEDDING_CACHE_MAX_SIZE));

/// Process-wide embedding model cache.
pub fn embedding_cache() -> &'static TtlLruCache<String, Arc<CachedEmbedder>> {
    &EMBEDDING_CACHE
}

/// Pass-through adapter around a loaded embedding model.
///
/// Callers hold this decorator rather than the raw provider handle; the
/// indirection is the seam where per-text result caching can be layered in
/// without touching call sites.
pub struct CachedEmbedder {
    inner: Arc<dyn Embedder>,
}

impl CachedEmbedder {
    /// Wraps a raw embedding model instance.
    #[must_use]
    pub fn new(inner: Arc<dyn Embedder>) -> Self {
        Self { inner }
    }
}

impl Embedder for CachedEmbedder {
    fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.inner.embed_documents(texts)
    }

    fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        self.inner.embed_query(text)
    }
}

/// Returns the cached embedder for `(tenant_id, provider, model)`, loading
/// and wrapping the raw model instance on a miss.
///
/// # Errors
///
/// Every loader failure propagates; callers treat it as fatal for the
/// request.
pub fn cached_embedder(
    models: &dyn ModelManager,
    tenant_id: &str,
    provider: &str,
    model: &str,
) -> Result<Arc<CachedEmbedder>> {
    let cache_key = key::derive(&[tenant_id, provider, model]);
    embedding_cache().get_or_load(cache_key, || {
        let raw = models.embedding_model(tenant_id, provider, model)?;
        tracing::info!(tenant_id, provider, model, "embedding model loaded");
        Ok(Arc::new(CachedEmbedder::new(raw)))
    })
}
