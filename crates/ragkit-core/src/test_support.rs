//! Shared in-memory fakes for unit tests.

use crate::error::{Error, Result};
use crate::model::{Embedder, ModelManager, RerankModel, RerankResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Embedder returning one fixed vector for every input.
pub(crate) struct StaticEmbedder {
    vector: Vec<f32>,
    pub query_calls: AtomicUsize,
}

impl StaticEmbedder {
    pub(crate) fn new(vector: Vec<f32>) -> Self {
        Self {
            vector,
            query_calls: AtomicUsize::new(0),
        }
    }
}

impl Embedder for StaticEmbedder {
    fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|_| self.vector.clone()).collect())
    }

    fn embed_query(&self, _text: &str) -> Result<Vec<f32>> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.vector.clone())
    }
}

/// Rerank model returning a fixed result list.
pub(crate) struct StaticRerankModel {
    results: Vec<RerankResult>,
    pub calls: AtomicUsize,
}

impl StaticRerankModel {
    pub(crate) fn new(results: Vec<RerankResult>) -> Self {
        Self {
            results,
            calls: AtomicUsize::new(0),
        }
    }
}

impl RerankModel for StaticRerankModel {
    fn invoke(
        &self,
        _query: &str,
        _docs: &[String],
        _score_threshold: Option<f64>,
        _top_n: Option<usize>,
        _user: Option<&str>,
    ) -> Result<Vec<RerankResult>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.results.clone())
    }
}

/// Model manager with scriptable behaviour per model type.
#[derive(Default)]
pub(crate) struct StubModelManager {
    pub embedder_vector: Vec<f32>,
    pub rerank_results: Vec<RerankResult>,
    pub deny_embedding: bool,
    pub deny_rerank: bool,
    pub fail_rerank: bool,
    pub embedding_loads: AtomicUsize,
    pub rerank_loads: AtomicUsize,
}

impl StubModelManager {
    pub(crate) fn with_vector(vector: Vec<f32>) -> Self {
        Self {
            embedder_vector: vector,
            ..Self::default()
        }
    }

    pub(crate) fn with_rerank_results(results: Vec<RerankResult>) -> Self {
        Self {
            rerank_results: results,
            ..Self::default()
        }
    }
}

impl ModelManager for StubModelManager {
    fn embedding_model(
        &self,
        _tenant_id: &str,
        provider: &str,
        model: &str,
    ) -> Result<Arc<dyn Embedder>> {
        if self.deny_embedding {
            return Err(Error::Unauthorized {
                provider: provider.to_string(),
                model: model.to_string(),
            });
        }
        self.embedding_loads.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(StaticEmbedder::new(self.embedder_vector.clone())))
    }

    fn rerank_model(
        &self,
        _tenant_id: &str,
        provider: &str,
        model: &str,
    ) -> Result<Arc<dyn RerankModel>> {
        if self.deny_rerank {
            return Err(Error::Unauthorized {
                provider: provider.to_string(),
                model: model.to_string(),
            });
        }
        if self.fail_rerank {
            return Err(Error::ModelLoad("connection refused".to_string()));
        }
        self.rerank_loads.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(StaticRerankModel::new(self.rerank_results.clone())))
    }
}
