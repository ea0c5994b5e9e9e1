//! Document record flowing through retrieval post-processing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Metadata key under which runners store the relevance score.
pub const SCORE_KEY: &str = "score";

/// Metadata key under which the weighted runner stores extracted keywords.
pub const KEYWORDS_KEY: &str = "keywords";

/// A retrieved document candidate.
///
/// Documents arrive from the upstream retrieval service already deduplicated.
/// Runners annotate them in place: `metadata["score"]` carries the relevance
/// score, `metadata["keywords"]` the extracted keyword list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Raw text content of the document chunk.
    pub page_content: String,

    /// Optional JSON metadata.
    #[serde(default)]
    pub metadata: Option<Map<String, JsonValue>>,

    /// Optional precomputed embedding vector.
    #[serde(default)]
    pub vector: Option<Vec<f32>>,

    /// Retrieval provider that produced this document.
    pub provider: String,
}

impl Document {
    /// Creates a document with empty metadata and no vector.
    #[must_use]
    pub fn new(page_content: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            page_content: page_content.into(),
            metadata: Some(Map::new()),
            vector: None,
            provider: provider.into(),
        }
    }

    /// Returns the relevance score stored in metadata, if any.
    #[must_use]
    pub fn score(&self) -> Option<f64> {
        self.metadata
            .as_ref()
            .and_then(|metadata| metadata.get(SCORE_KEY))
            .and_then(JsonValue::as_f64)
    }

    /// Writes the relevance score into metadata.
    ///
    /// A document without metadata is left untouched; runners drop such
    /// documents rather than fabricating a metadata map for them.
    pub fn set_score(&mut self, score: f64) {
        if let Some(metadata) = self.metadata.as_mut() {
            metadata.insert(SCORE_KEY.to_string(), JsonValue::from(score));
        }
    }

    /// Returns a metadata string field, if present.
    #[must_use]
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|metadata| metadata.get(key))
            .and_then(JsonValue::as_str)
    }
}
