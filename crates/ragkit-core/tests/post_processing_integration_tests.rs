//! Integration tests for the post-processing pipeline: strategy selection,
//! cached model resolution, scoring and monitoring, driven through the
//! public API with in-memory model providers.

use ragkit_core::cache::CacheMonitor;
use ragkit_core::model::{Embedder, ModelManager, RerankModel, RerankResult};
use ragkit_core::rerank::{KeywordSetting, VectorSetting};
use ragkit_core::{
    cache_snapshots, DataPostProcessor, Document, Error, RerankingModelConfig, Result, Weights,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("ragkit_core=debug")
        .with_test_writer()
        .try_init();
}

// =============================================================================
// In-memory model providers
// =============================================================================

struct FixedEmbedder {
    vector: Vec<f32>,
}

impl Embedder for FixedEmbedder {
    fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|_| self.vector.clone()).collect())
    }

    fn embed_query(&self, _text: &str) -> Result<Vec<f32>> {
        Ok(self.vector.clone())
    }
}

struct FixedRerankModel {
    results: Vec<RerankResult>,
}

impl RerankModel for FixedRerankModel {
    fn invoke(
        &self,
        _query: &str,
        _docs: &[String],
        _score_threshold: Option<f64>,
        _top_n: Option<usize>,
        _user: Option<&str>,
    ) -> Result<Vec<RerankResult>> {
        Ok(self.results.clone())
    }
}

struct FakeModelManager {
    query_vector: Vec<f32>,
    rerank_results: Vec<RerankResult>,
    deny_rerank: bool,
    rerank_loads: AtomicUsize,
}

impl FakeModelManager {
    fn new(query_vector: Vec<f32>) -> Self {
        Self {
            query_vector,
            rerank_results: Vec::new(),
            deny_rerank: false,
            rerank_loads: AtomicUsize::new(0),
        }
    }

    fn with_rerank_results(results: Vec<RerankResult>) -> Self {
        Self {
            rerank_results: results,
            ..Self::new(vec![1.0, 0.0])
        }
    }

    fn denying_rerank() -> Self {
        Self {
            deny_rerank: true,
            ..Self::new(vec![1.0, 0.0])
        }
    }
}

impl ModelManager for FakeModelManager {
    fn embedding_model(
        &self,
        _tenant_id: &str,
        _provider: &str,
        _model: &str,
    ) -> Result<Arc<dyn Embedder>> {
        Ok(Arc::new(FixedEmbedder {
            vector: self.query_vector.clone(),
        }))
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
        self.rerank_loads.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(FixedRerankModel {
            results: self.rerank_results.clone(),
        }))
    }
}

fn weights(vector_weight: f64, keyword_weight: f64) -> Weights {
    Weights {
        vector_setting: VectorSetting {
            vector_weight,
            embedding_provider_name: "openai".to_string(),
            embedding_model_name: "text-embedding-ada-002".to_string(),
        },
        keyword_setting: KeywordSetting { keyword_weight },
    }
}

fn rerank_config() -> RerankingModelConfig {
    RerankingModelConfig {
        reranking_provider_name: "cohere".to_string(),
        reranking_model_name: "rerank-english-v2.0".to_string(),
    }
}

fn doc_with_vector(content: &str, vector: Vec<f32>) -> Document {
    let mut doc = Document::new(content, "dataset");
    doc.vector = Some(vector);
    doc
}

// =============================================================================
// Weighted rerank end to end
// =============================================================================

#[test]
fn test_weighted_rerank_scores_filters_and_sorts() {
    init_tracing();
    let manager = Arc::new(FakeModelManager::new(vec![1.0, 0.0]));
    let processor = DataPostProcessor::new(
        manager,
        "tenant-int-weighted",
        "weighted_score",
        None,
        Some(weights(0.7, 0.3)),
        false,
    )
    .expect("processor");

    let docs = vec![
        doc_with_vector("rust ownership guarantees memory safety", vec![1.0, 0.0]),
        doc_with_vector("python beginner tutorial", vec![0.0, 1.0]),
    ];

    let reranked = processor
        .invoke("rust memory safety", docs, Some(0.5), None, None)
        .expect("invoke");

    // The aligned, keyword-overlapping document clears the threshold; the
    // orthogonal one scores 0 and is dropped.
    assert_eq!(reranked.len(), 1);
    assert!(reranked[0].page_content.starts_with("rust"));
    let score = reranked[0].score().expect("score");
    assert!(score > 0.7 && score <= 1.0);

    let metadata = reranked[0].metadata.as_ref().expect("metadata");
    assert!(metadata.contains_key("keywords"));
}

#[test]
fn test_weighted_rerank_respects_top_n() {
    let manager = Arc::new(FakeModelManager::new(vec![1.0, 0.0]));
    let processor = DataPostProcessor::new(
        manager,
        "tenant-int-topn",
        "weighted_score",
        None,
        Some(weights(1.0, 0.0)),
        false,
    )
    .expect("processor");

    let docs = vec![
        doc_with_vector("a", vec![0.0, 1.0]),
        doc_with_vector("b", vec![1.0, 0.0]),
        doc_with_vector("c", vec![1.0, 1.0]),
    ];
    let reranked = processor
        .invoke("query", docs, None, Some(1), None)
        .expect("invoke");

    assert_eq!(reranked.len(), 1);
    assert_eq!(reranked[0].page_content, "b");
}

// =============================================================================
// Model rerank end to end
// =============================================================================

#[test]
fn test_model_rerank_threshold_and_truncation() {
    init_tracing();
    let results = vec![
        RerankResult { index: 0, text: "r0".to_string(), score: 0.9 },
        RerankResult { index: 1, text: "r1".to_string(), score: 0.8 },
        RerankResult { index: 2, text: "r2".to_string(), score: 0.4 },
        RerankResult { index: 3, text: "r3".to_string(), score: 0.3 },
        RerankResult { index: 4, text: "r4".to_string(), score: 0.1 },
    ];
    let manager = Arc::new(FakeModelManager::with_rerank_results(results));
    let processor = DataPostProcessor::new(
        manager,
        "tenant-int-model",
        "reranking_model",
        Some(rerank_config()),
        None,
        false,
    )
    .expect("processor");

    let docs: Vec<Document> = (0..5)
        .map(|i| Document::new(format!("candidate {i}"), "dataset"))
        .collect();
    let reranked = processor
        .invoke("query", docs, Some(0.35), Some(2), None)
        .expect("invoke");

    assert_eq!(reranked.len(), 2);
    assert_eq!(reranked[0].score(), Some(0.9));
    assert_eq!(reranked[1].score(), Some(0.8));
}

#[test]
fn test_rerank_model_is_cached_across_processors() {
    let manager = Arc::new(FakeModelManager::with_rerank_results(vec![]));

    for _ in 0..3 {
        let _ = DataPostProcessor::new(
            Arc::clone(&manager) as Arc<dyn ModelManager>,
            "tenant-int-cached",
            "reranking_model",
            Some(rerank_config()),
            None,
            false,
        )
        .expect("processor");
    }

    assert_eq!(manager.rerank_loads.load(Ordering::SeqCst), 1);
}

// =============================================================================
// Degradation and composition
// =============================================================================

#[test]
fn test_unauthorized_rerank_passes_documents_through() {
    let manager = Arc::new(FakeModelManager::denying_rerank());
    let processor = DataPostProcessor::new(
        manager,
        "tenant-int-unauth",
        "reranking_model",
        Some(rerank_config()),
        None,
        false,
    )
    .expect("processor");

    let docs = vec![
        Document::new("untouched first", "dataset"),
        Document::new("untouched second", "dataset"),
    ];
    let out = processor
        .invoke("query", docs, Some(0.9), Some(1), None)
        .expect("invoke");

    // Passthrough ignores threshold and top_n: there is no runner.
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].page_content, "untouched first");
    assert!(out[0].score().is_none());
}

#[test]
fn test_rerank_then_reorder_composition() {
    let manager = Arc::new(FakeModelManager::new(vec![1.0, 0.0]));
    let processor = DataPostProcessor::new(
        manager,
        "tenant-int-reorder",
        "weighted_score",
        None,
        Some(weights(1.0, 0.0)),
        true,
    )
    .expect("processor");

    let docs = vec![
        doc_with_vector("best", vec![1.0, 0.0]),
        doc_with_vector("good", vec![1.0, 0.5]),
        doc_with_vector("weak", vec![0.0, 1.0]),
        doc_with_vector("worst", vec![-1.0, 0.0]),
    ];
    let out = processor
        .invoke("query", docs, None, None, None)
        .expect("invoke");

    // Rerank orders best-first, reorder then spreads the strongest to the
    // edges: [2nd, 4th, 3rd, 1st].
    let contents: Vec<&str> = out.iter().map(|d| d.page_content.as_str()).collect();
    assert_eq!(contents, vec!["good", "worst", "weak", "best"]);
}

// =============================================================================
// Monitoring
// =============================================================================

#[test]
fn test_cache_snapshots_cover_every_instance_cache() {
    let names: Vec<&str> = cache_snapshots()
        .iter()
        .map(|snapshot| snapshot.name)
        .collect();
    assert_eq!(
        names,
        vec![
            "embedding_model",
            "vector_processor",
            "rerank_model",
            "weight_embedding"
        ]
    );
}

#[test]
fn test_monitor_renders_all_caches() {
    // Generate some traffic first.
    let manager = Arc::new(FakeModelManager::new(vec![1.0, 0.0]));
    let processor = DataPostProcessor::new(
        manager,
        "tenant-int-monitor",
        "weighted_score",
        None,
        Some(weights(1.0, 0.0)),
        false,
    )
    .expect("processor");
    let _ = processor
        .invoke(
            "query",
            vec![doc_with_vector("doc", vec![1.0, 0.0])],
            None,
            None,
            None,
        )
        .expect("invoke");

    let snapshots = cache_snapshots();
    let monitor = CacheMonitor::new();

    let report = monitor.text_report(&snapshots);
    assert!(report.contains("weight_embedding:"));
    assert!(report.contains("uptime:"));

    let metrics = CacheMonitor::prometheus_metrics(&snapshots);
    assert!(metrics.contains("ragkit_weight_embedding_cache_hits"));
    assert!(metrics.contains("ragkit_rerank_model_cache_misses"));

    let performance = CacheMonitor::performance_report(&snapshots);
    assert!(performance.total_requests >= 1);
}
