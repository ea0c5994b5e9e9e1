//! Weighted rerank: fusion of keyword and vector similarity.
//!
//! Each document's score is
//! `vector_weight * cos_vec + keyword_weight * cos_kw`, where `cos_kw` is
//! the cosine between tf-idf keyword vectors of query and document, and
//! `cos_vec` is the cosine between their embeddings (an upstream-provided
//! `metadata["score"]` is reused verbatim). Query embedding goes through a
//! dedicated process-wide embedder cache, separate from the dataset
//! embedding cache.

#![allow(clippy::cast_precision_loss)] // tf-idf statistics fit f64 comfortably

use super::{keyword, sort_by_score_desc, RerankRunner};
use crate::cache::{key, TtlLruCache};
use crate::document::{Document, KEYWORDS_KEY};
use crate::embedding::CachedEmbedder;
use crate::error::Result;
use crate::model::{Embedder, ModelManager};
use once_cell::sync::Lazy;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

/// TTL for the weighted runner's cached embedding models.
const WEIGHT_EMBEDDING_CACHE_TTL: Duration = Duration::from_secs(1800);
/// Maximum number of embedding models cached for weighted reranking.
const WEIGHT_EMBEDDING_CACHE_MAX_SIZE: usize = 50;

static WEIGHT_EMBEDDING_CACHE: Lazy<TtlLruCache<String, Arc<CachedEmbedder>>> = Lazy::new(|| {
    TtlLruCache::new(
        "weight_embedding",
        WEIGHT_EMBEDDING_CACHE_TTL,
        WEIGHT_EMBEDDING_CACHE_MAX_SIZE,
    )
});

/// Process-wide embedding cache dedicated to weighted reranking.
pub fn weight_embedding_cache() -> &'static TtlLruCache<String, Arc<CachedEmbedder>> {
    &WEIGHT_EMBEDDING_CACHE
}

/// Vector-similarity side of the weighted fusion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorSetting {
    /// Weight of the vector similarity component.
    pub vector_weight: f64,
    /// Provider of the embedding model used for query encoding.
    pub embedding_provider_name: String,
    /// Name of the embedding model used for query encoding.
    pub embedding_model_name: String,
}

/// Keyword-similarity side of the weighted fusion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordSetting {
    /// Weight of the keyword similarity component.
    pub keyword_weight: f64,
}

/// Fusion weights. By convention the two weights sum to 1.0; this is not
/// enforced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weights {
    /// Vector similarity settings.
    pub vector_setting: VectorSetting,
    /// Keyword similarity settings.
    pub keyword_setting: KeywordSetting,
}

/// Rerank runner fusing keyword and vector similarity.
pub struct WeightRerankRunner {
    tenant_id: String,
    weights: Weights,
    models: Arc<dyn ModelManager>,
}

impl WeightRerankRunner {
    /// Creates a runner for one tenant with the given fusion weights.
    #[must_use]
    pub fn new(models: Arc<dyn ModelManager>, tenant_id: impl Into<String>, weights: Weights) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            weights,
            models,
        }
    }

    /// Tf-idf cosine between the query and every document.
    ///
    /// Side effect: each document's keyword list is written into
    /// `metadata["keywords"]` where metadata exists.
    fn keyword_scores(&self, query: &str, documents: &mut [Document]) -> Vec<f64> {
        let query_keywords = keyword::extract_keywords(query);
        let documents_keywords: Vec<Vec<String>> = documents
            .iter_mut()
            .map(|document| {
                let keywords = keyword::extract_keywords(&document.page_content);
                if let Some(metadata) = document.metadata.as_mut() {
                    metadata.insert(KEYWORDS_KEY.to_string(), json!(keywords));
                }
                keywords
            })
            .collect();

        let idf = inverse_document_frequencies(&documents_keywords);
        let query_tfidf = tfidf_vector(&query_keywords, &idf);
        documents_keywords
            .iter()
            .map(|keywords| sparse_cosine(&query_tfidf, &tfidf_vector(keywords, &idf)))
            .collect()
    }

    /// Embedding cosine between the query and every document.
    ///
    /// An upstream-provided `metadata["score"]` is reused verbatim. A
    /// document with neither an upstream score nor a vector scores 0.0.
    fn vector_scores(&self, query: &str, documents: &[Document]) -> Result<Vec<f64>> {
        let setting = &self.weights.vector_setting;
        let embedder = cached_weight_embedder(
            self.models.as_ref(),
            &self.tenant_id,
            &setting.embedding_provider_name,
            &setting.embedding_model_name,
        )?;
        let query_vector = embedder.embed_query(query)?;

        Ok(documents
            .iter()
            .map(|document| {
                if let Some(score) = document.score() {
                    return score;
                }
                match &document.vector {
                    Some(vector) => f64::from(cosine_similarity(&query_vector, vector)),
                    None => {
                        tracing::warn!(
                            "document has neither an upstream score nor a vector, similarity set to 0"
                        );
                        0.0
                    }
                }
            })
            .collect())
    }
}

impl RerankRunner for WeightRerankRunner {
    fn run(
        &self,
        query: &str,
        mut documents: Vec<Document>,
        score_threshold: Option<f64>,
        top_n: Option<usize>,
        _user: Option<&str>,
    ) -> Result<Vec<Document>> {
        let keyword_scores = self.keyword_scores(query, &mut documents);
        let vector_scores = self.vector_scores(query, &documents)?;

        let mut reranked = Vec::with_capacity(documents.len());
        for ((mut document, keyword_score), vector_score) in
            documents.into_iter().zip(keyword_scores).zip(vector_scores)
        {
            let score = self.weights.vector_setting.vector_weight * vector_score
                + self.weights.keyword_setting.keyword_weight * keyword_score;
            if score_threshold.is_some_and(|threshold| score < threshold) {
                continue;
            }
            if document.metadata.is_none() {
                continue;
            }
            document.set_score(score);
            reranked.push(document);
        }

        sort_by_score_desc(&mut reranked);
        if let Some(top_n) = top_n {
            reranked.truncate(top_n);
        }
        Ok(reranked)
    }
}

/// Returns the cached embedder for the weighted runner, loading and
/// wrapping the raw model instance on a miss.
fn cached_weight_embedder(
    models: &dyn ModelManager,
    tenant_id: &str,
    provider: &str,
    model: &str,
) -> Result<Arc<CachedEmbedder>> {
    let cache_key = key::derive(&[tenant_id, provider, model]);
    weight_embedding_cache().get_or_load(cache_key, || {
        let raw = models.embedding_model(tenant_id, provider, model)?;
        tracing::info!(
            tenant_id,
            provider,
            model,
            "weighted rerank embedding model loaded"
        );
        Ok(Arc::new(CachedEmbedder::new(raw)))
    })
}

/// `idf(k) = ln((1 + N) / (1 + df(k))) + 1` over every keyword appearing
/// in any document.
fn inverse_document_frequencies(documents_keywords: &[Vec<String>]) -> FxHashMap<String, f64> {
    let total = documents_keywords.len();
    let mut document_frequency: FxHashMap<&str, usize> = FxHashMap::default();
    for keywords in documents_keywords {
        let distinct: FxHashSet<&str> = keywords.iter().map(String::as_str).collect();
        for keyword in distinct {
            *document_frequency.entry(keyword).or_insert(0) += 1;
        }
    }
    document_frequency
        .into_iter()
        .map(|(keyword, df)| {
            let idf = ((1 + total) as f64 / (1 + df) as f64).ln() + 1.0;
            (keyword.to_string(), idf)
        })
        .collect()
}

/// Tf-idf weights for one keyword multiset; keywords absent from the
/// corpus get idf 0.
fn tfidf_vector(keywords: &[String], idf: &FxHashMap<String, f64>) -> FxHashMap<String, f64> {
    let mut term_freqs: FxHashMap<&str, f64> = FxHashMap::default();
    for keyword in keywords {
        *term_freqs.entry(keyword).or_insert(0.0) += 1.0;
    }
    term_freqs
        .into_iter()
        .map(|(keyword, tf)| {
            let weight = tf * idf.get(keyword).copied().unwrap_or(0.0);
            (keyword.to_string(), weight)
        })
        .collect()
}

/// Cosine similarity between sparse tf-idf vectors; 0.0 for zero vectors.
fn sparse_cosine(a: &FxHashMap<String, f64>, b: &FxHashMap<String, f64>) -> f64 {
    let numerator: f64 = a
        .iter()
        .filter_map(|(keyword, weight_a)| b.get(keyword).map(|weight_b| weight_a * weight_b))
        .sum();
    let norm_a: f64 = a.values().map(|v| v * v).sum::<f64>().sqrt();
    let norm_b: f64 = b.values().map(|v| v * v).sum::<f64>().sqrt();
    let denominator = norm_a * norm_b;
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Cosine similarity between dense vectors; 0.0 for zero vectors or a
/// dimension mismatch.
pub(super) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        tracing::warn!(
            expected = a.len(),
            actual = b.len(),
            "vector dimension mismatch, similarity set to 0"
        );
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}
