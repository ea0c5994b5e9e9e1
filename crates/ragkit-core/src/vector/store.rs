//! Vector store facade with a process-wide processor cache.
//!
//! Constructing a processor means a network round trip to the backend, so
//! live handles are cached per `(dataset, backend)` with TTL + LRU bounds.
//! The facade binds one dataset to its cached embedder and cached processor
//! and exposes the write/search surface the retrieval pipeline consumes.

use super::backend::VectorBackend;
use super::processor::VectorProcessor;
use super::registry::VectorFactoryRegistry;
use crate::cache::{key, TtlLruCache};
use crate::config::VectorStoreConfig;
use crate::dataset::Dataset;
use crate::document::Document;
use crate::embedding::{self, CachedEmbedder};
use crate::error::{Error, Result};
use crate::model::{Embedder, ModelManager};
use once_cell::sync::Lazy;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// TTL for cached processor handles.
const PROCESSOR_CACHE_TTL: Duration = Duration::from_secs(1800);
/// Maximum number of cached processor handles.
const PROCESSOR_CACHE_MAX_SIZE: usize = 100;

/// Documents embedded per batch during collection builds.
const EMBEDDING_BATCH_SIZE: usize = 1000;

/// Metadata attributes stored alongside vectors by default.
pub const DEFAULT_ATTRIBUTES: [&str; 4] = ["doc_id", "dataset_id", "document_id", "doc_hash"];

static PROCESSOR_CACHE: Lazy<TtlLruCache<String, Arc<dyn VectorProcessor>>> = Lazy::new(|| {
    TtlLruCache::new(
        "vector_processor",
        PROCESSOR_CACHE_TTL,
        PROCESSOR_CACHE_MAX_SIZE,
    )
});

/// Process-wide vector processor cache.
pub fn processor_cache() -> &'static TtlLruCache<String, Arc<dyn VectorProcessor>> {
    &PROCESSOR_CACHE
}

/// Resolves which backend holds (or will hold) the dataset's collection.
///
/// The dataset's stored index structure wins; without one, a whitelisted
/// tenant is routed to the managed backend, everyone else to the configured
/// default.
///
/// # Errors
///
/// Returns `Error::Config` when no backend can be resolved.
pub fn resolve_backend(dataset: &Dataset, config: &VectorStoreConfig) -> Result<VectorBackend> {
    if let Some(index_struct) = &dataset.index_struct {
        return Ok(index_struct.backend);
    }
    if config.is_whitelisted(&dataset.tenant_id) {
        return Ok(VectorBackend::TidbOnQdrant);
    }
    config
        .backend
        .ok_or_else(|| Error::Config("vector store backend must be specified".to_string()))
}

/// One dataset's view onto its vector collection.
pub struct VectorStore {
    dataset: Dataset,
    embedder: Arc<CachedEmbedder>,
    processor: Arc<dyn VectorProcessor>,
}

impl VectorStore {
    /// Binds a dataset to its embedder and processor, resolving both
    /// through the process-wide caches.
    ///
    /// # Errors
    ///
    /// Fails when the embedding model cannot be loaded, the backend cannot
    /// be resolved, or the processor cannot be initialized.
    pub fn new(
        dataset: Dataset,
        attributes: Option<Vec<String>>,
        registry: &VectorFactoryRegistry,
        models: &dyn ModelManager,
        config: &VectorStoreConfig,
    ) -> Result<Self> {
        let attributes = attributes.unwrap_or_else(|| {
            DEFAULT_ATTRIBUTES.iter().map(ToString::to_string).collect()
        });

        let embedder = embedding::cached_embedder(
            models,
            &dataset.tenant_id,
            &dataset.embedding_model_provider,
            &dataset.embedding_model,
        )?;

        let backend = resolve_backend(&dataset, config)?;
        let cache_key = key::derive(&[&dataset.id, backend.as_str()]);
        let init_start = Instant::now();
        let processor = processor_cache().get_or_load(cache_key, || {
            registry
                .factory(backend)?
                .init(&dataset, &attributes, Arc::clone(&embedder))
        })?;
        tracing::debug!(
            dataset_id = %dataset.id,
            backend = backend.as_str(),
            init_secs = init_start.elapsed().as_secs_f64(),
            "vector processor resolved"
        );

        Ok(Self {
            dataset,
            embedder,
            processor,
        })
    }

    /// Dataset this store is bound to.
    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Embeds and stores documents in batches.
    ///
    /// # Errors
    ///
    /// Returns the first embedding or backend error encountered.
    pub fn create(&self, documents: &[Document]) -> Result<()> {
        if documents.is_empty() {
            return Ok(());
        }
        let batches = documents.len().div_ceil(EMBEDDING_BATCH_SIZE);
        for (batch_index, batch) in documents.chunks(EMBEDDING_BATCH_SIZE).enumerate() {
            let batch_start = Instant::now();
            let texts: Vec<String> = batch.iter().map(|d| d.page_content.clone()).collect();
            let embeddings = self.embedder.embed_documents(&texts)?;
            self.processor.create(batch, &embeddings)?;
            tracing::info!(
                dataset_id = %self.dataset.id,
                batch = batch_index + 1,
                batches,
                documents = batch.len(),
                batch_secs = batch_start.elapsed().as_secs_f64(),
                "embedded and stored document batch"
            );
        }
        Ok(())
    }

    /// Embeds and stores documents, optionally skipping ones already stored.
    ///
    /// # Errors
    ///
    /// Returns the first embedding or backend error encountered.
    pub fn add_documents(&self, documents: Vec<Document>, duplicate_check: bool) -> Result<()> {
        let documents = if duplicate_check {
            self.filter_duplicates(documents)?
        } else {
            documents
        };
        if documents.is_empty() {
            return Ok(());
        }
        let texts: Vec<String> = documents.iter().map(|d| d.page_content.clone()).collect();
        let embeddings = self.embedder.embed_documents(&texts)?;
        self.processor.create(&documents, &embeddings)
    }

    /// True if a document with the given id is already stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend lookup fails.
    pub fn text_exists(&self, id: &str) -> Result<bool> {
        self.processor.text_exists(id)
    }

    /// Deletes documents by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend delete fails.
    pub fn delete_by_ids(&self, ids: &[String]) -> Result<()> {
        self.processor.delete_by_ids(ids)
    }

    /// Deletes every document whose metadata field equals `value`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend delete fails.
    pub fn delete_by_metadata_field(&self, key: &str, value: &str) -> Result<()> {
        self.processor.delete_by_metadata_field(key, value)
    }

    /// Embeds the query and runs a similarity search.
    ///
    /// # Errors
    ///
    /// Returns an error if embedding or the backend query fails.
    pub fn search_by_vector(&self, query: &str, top_k: usize) -> Result<Vec<Document>> {
        let query_vector = self.embedder.embed_query(query)?;
        self.processor.search_by_vector(&query_vector, top_k)
    }

    /// Runs a full-text search.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend query fails.
    pub fn search_by_full_text(&self, query: &str, top_k: usize) -> Result<Vec<Document>> {
        self.processor.search_by_full_text(query, top_k)
    }

    /// Drops the whole collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend delete fails.
    pub fn delete(&self) -> Result<()> {
        self.processor.delete()
    }

    fn filter_duplicates(&self, documents: Vec<Document>) -> Result<Vec<Document>> {
        let mut kept = Vec::with_capacity(documents.len());
        for document in documents {
            if let Some(doc_id) = document.metadata_str("doc_id") {
                if self.processor.text_exists(doc_id)? {
                    tracing::debug!(doc_id, "skipping duplicate document");
                    continue;
                }
            }
            kept.push(document);
        }
        Ok(kept)
    }
}
