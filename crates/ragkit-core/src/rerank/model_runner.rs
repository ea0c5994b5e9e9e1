//! Cross-encoder rerank runner with a process-wide model cache.

use super::{sort_by_score_desc, RerankRunner};
use crate::cache::{key, TtlLruCache};
use crate::document::{Document, SCORE_KEY};
use crate::error::{Error, Result};
use crate::model::{ModelManager, RerankModel};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// TTL for cached rerank model instances.
const RERANK_MODEL_CACHE_TTL: Duration = Duration::from_secs(1800);
/// Maximum number of cached rerank model instances; rerank models can be
/// large, so the bound is tighter than for embedders.
const RERANK_MODEL_CACHE_MAX_SIZE: usize = 50;

static RERANK_MODEL_CACHE: Lazy<TtlLruCache<String, Arc<dyn RerankModel>>> = Lazy::new(|| {
    TtlLruCache::new(
        "rerank_model",
        RERANK_MODEL_CACHE_TTL,
        RERANK_MODEL_CACHE_MAX_SIZE,
    )
});

/// Process-wide rerank model cache.
pub fn rerank_model_cache() -> &'static TtlLruCache<String, Arc<dyn RerankModel>> {
    &RERANK_MODEL_CACHE
}

/// Rerank model selection for a dataset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RerankingModelConfig {
    /// Provider of the rerank model.
    pub reranking_provider_name: String,
    /// Name of the rerank model.
    pub reranking_model_name: String,
}

/// Resolves the cached rerank model for a tenant, loading on a miss.
///
/// Returns `Ok(None)` when no model is configured, a name is empty, or the
/// provider rejects the tenant's credentials; the caller degrades to
/// passthrough in all three cases.
///
/// # Errors
///
/// Non-authorization load failures propagate; they are transient and the
/// next request retries.
pub fn cached_rerank_model(
    models: &dyn ModelManager,
    tenant_id: &str,
    config: Option<&RerankingModelConfig>,
) -> Result<Option<Arc<dyn RerankModel>>> {
    let Some(config) = config else {
        return Ok(None);
    };
    if config.reranking_provider_name.is_empty() || config.reranking_model_name.is_empty() {
        return Ok(None);
    }

    let cache_key = key::derive(&[
        tenant_id,
        &config.reranking_provider_name,
        &config.reranking_model_name,
    ]);
    let loaded = rerank_model_cache().get_or_load(cache_key, || {
        models.rerank_model(
            tenant_id,
            &config.reranking_provider_name,
            &config.reranking_model_name,
        )
    });
    match loaded {
        Ok(model) => Ok(Some(model)),
        Err(Error::Unauthorized { provider, model }) => {
            tracing::warn!(
                tenant_id,
                provider = %provider,
                model = %model,
                "authorization failed loading rerank model, reranking disabled"
            );
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// Rerank runner scoring the whole batch through a cross-encoder model.
pub struct RerankModelRunner {
    model: Arc<dyn RerankModel>,
}

impl RerankModelRunner {
    /// Creates a runner around a loaded rerank model instance.
    #[must_use]
    pub fn new(model: Arc<dyn RerankModel>) -> Self {
        Self { model }
    }
}

impl RerankRunner for RerankModelRunner {
    fn run(
        &self,
        query: &str,
        documents: Vec<Document>,
        score_threshold: Option<f64>,
        top_n: Option<usize>,
        user: Option<&str>,
    ) -> Result<Vec<Document>> {
        let docs: Vec<String> = documents
            .iter()
            .map(|document| document.page_content.clone())
            .collect();

        let results = self
            .model
            .invoke(query, &docs, score_threshold, top_n, user)?;

        let mut reranked = Vec::with_capacity(results.len());
        for result in results {
            if !score_threshold.map_or(true, |threshold| result.score >= threshold) {
                continue;
            }
            let Some(source) = documents.get(result.index) else {
                tracing::warn!(index = result.index, "rerank result index out of range");
                continue;
            };
            let Some(mut metadata) = source.metadata.clone() else {
                continue;
            };
            metadata.insert(SCORE_KEY.to_string(), serde_json::Value::from(result.score));
            reranked.push(Document {
                page_content: result.text,
                metadata: Some(metadata),
                vector: None,
                provider: source.provider.clone(),
            });
        }

        sort_by_score_desc(&mut reranked);
        if let Some(top_n) = top_n {
            reranked.truncate(top_n);
        }
        Ok(reranked)
    }
}
