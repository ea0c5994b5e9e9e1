//! Dataset descriptor consumed by the vector store layer.

use crate::vector::VectorBackend;
use serde::{Deserialize, Serialize};

/// A dataset owning one vector collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    /// Unique dataset identifier.
    pub id: String,

    /// Tenant that owns the dataset.
    pub tenant_id: String,

    /// Provider of the embedding model bound to this dataset.
    pub embedding_model_provider: String,

    /// Name of the embedding model bound to this dataset.
    pub embedding_model: String,

    /// Stored index structure, present once the collection has been built.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_struct: Option<IndexStruct>,
}

/// Stored index structure recording which backend holds the collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexStruct {
    /// Backend the collection lives in.
    #[serde(rename = "type")]
    pub backend: VectorBackend,

    /// Collection binding details.
    pub vector_store: VectorStoreBinding,
}

/// Binding of a dataset to a concrete collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorStoreBinding {
    /// Collection name prefix in the backend.
    pub class_prefix: String,
}

impl IndexStruct {
    /// Creates an index structure for a freshly initialized collection.
    #[must_use]
    pub fn new(backend: VectorBackend, collection_name: impl Into<String>) -> Self {
        Self {
            backend,
            vector_store: VectorStoreBinding {
                class_prefix: collection_name.into(),
            },
        }
    }
}
