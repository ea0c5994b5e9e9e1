//! Supported vector store backend tags.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A supported vector store backend.
///
/// The set is closed: supporting a new backend means adding a variant here
/// and an entry in the factory registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VectorBackend {
    /// Qdrant.
    Qdrant,
    /// Milvus.
    Milvus,
    /// `PostgreSQL` with the pgvector extension.
    Pgvector,
    /// Weaviate.
    Weaviate,
    /// Chroma.
    Chroma,
    /// Elasticsearch with dense-vector mappings.
    Elasticsearch,
    /// `OpenSearch` with k-NN indexes.
    Opensearch,
    /// Managed Qdrant multiplexed behind TiDB routing.
    TidbOnQdrant,
}

impl VectorBackend {
    /// Every supported backend, in registry order.
    pub const ALL: [Self; 8] = [
        Self::Qdrant,
        Self::Milvus,
        Self::Pgvector,
        Self::Weaviate,
        Self::Chroma,
        Self::Elasticsearch,
        Self::Opensearch,
        Self::TidbOnQdrant,
    ];

    /// Canonical tag used in stored index structures, cache keys and
    /// configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Qdrant => "qdrant",
            Self::Milvus => "milvus",
            Self::Pgvector => "pgvector",
            Self::Weaviate => "weaviate",
            Self::Chroma => "chroma",
            Self::Elasticsearch => "elasticsearch",
            Self::Opensearch => "opensearch",
            Self::TidbOnQdrant => "tidb_on_qdrant",
        }
    }
}

impl fmt::Display for VectorBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VectorBackend {
    type Err = Error;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|backend| backend.as_str() == tag)
            .ok_or_else(|| Error::UnsupportedBackend(tag.to_string()))
    }
}
