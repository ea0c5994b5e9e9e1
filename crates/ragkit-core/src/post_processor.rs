//! Post-processing of retrieved documents: rerank, then reorder.

use crate::document::Document;
use crate::error::Result;
use crate::model::ModelManager;
use crate::rerank::{
    cached_rerank_model, RerankMode, RerankModelRunner, RerankRunner, RerankingModelConfig,
    ReorderRunner, WeightRerankRunner, Weights,
};
use std::str::FromStr;
use std::sync::Arc;

/// Applies the configured rerank strategy and the optional reorder step to
/// one request's candidate documents.
///
/// The strategy is fixed at construction:
///
/// | mode | extra input | runner |
/// |---|---|---|
/// | `weighted_score` | weights | weighted fusion |
/// | `reranking_model` | loadable model with non-empty names | cross-encoder |
/// | `reranking_model` | model missing, names empty, or unauthorized | none |
/// | anything else | — | none |
///
/// Without a runner, `invoke` passes documents through unchanged (subject
/// to reorder).
pub struct DataPostProcessor {
    rerank_runner: Option<Box<dyn RerankRunner>>,
    reorder_runner: Option<ReorderRunner>,
}

impl DataPostProcessor {
    /// Selects the rerank strategy for a tenant.
    ///
    /// # Errors
    ///
    /// Returns a transient load error when the rerank model exists but
    /// cannot be constructed. An authorization failure is not an error
    /// here: it selects the passthrough strategy.
    pub fn new(
        models: Arc<dyn ModelManager>,
        tenant_id: &str,
        reranking_mode: &str,
        reranking_model: Option<RerankingModelConfig>,
        weights: Option<Weights>,
        reorder_enabled: bool,
    ) -> Result<Self> {
        let rerank_runner = Self::build_rerank_runner(
            models,
            tenant_id,
            reranking_mode,
            reranking_model.as_ref(),
            weights,
        )?;
        Ok(Self {
            rerank_runner,
            reorder_runner: reorder_enabled.then(ReorderRunner::new),
        })
    }

    /// Runs the selected strategy over the documents, then the reorder
    /// step. Either stage being absent is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the rerank runner fails.
    pub fn invoke(
        &self,
        query: &str,
        documents: Vec<Document>,
        score_threshold: Option<f64>,
        top_n: Option<usize>,
        user: Option<&str>,
    ) -> Result<Vec<Document>> {
        let mut documents = documents;
        if let Some(runner) = &self.rerank_runner {
            documents = runner.run(query, documents, score_threshold, top_n, user)?;
        }
        if let Some(reorder) = &self.reorder_runner {
            documents = reorder.run(documents);
        }
        Ok(documents)
    }

    /// True when a rerank runner was selected.
    #[must_use]
    pub fn has_rerank_runner(&self) -> bool {
        self.rerank_runner.is_some()
    }

    fn build_rerank_runner(
        models: Arc<dyn ModelManager>,
        tenant_id: &str,
        reranking_mode: &str,
        reranking_model: Option<&RerankingModelConfig>,
        weights: Option<Weights>,
    ) -> Result<Option<Box<dyn RerankRunner>>> {
        match RerankMode::from_str(reranking_mode) {
            Ok(RerankMode::WeightedScore) => {
                let Some(weights) = weights else {
                    return Ok(None);
                };
                Ok(Some(Box::new(WeightRerankRunner::new(
                    models, tenant_id, weights,
                ))))
            }
            Ok(RerankMode::RerankingModel) => {
                match cached_rerank_model(models.as_ref(), tenant_id, reranking_model)? {
                    Some(model) => Ok(Some(Box::new(RerankModelRunner::new(model)))),
                    None => Ok(None),
                }
            }
            Err(_) => {
                tracing::debug!(mode = reranking_mode, "no rerank runner for mode");
                Ok(None)
            }
        }
    }
}
