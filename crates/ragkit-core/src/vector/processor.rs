//! Vector store processor interface.

use crate::document::Document;
use crate::error::Result;

/// A live handle to one collection in a vector store backend.
///
/// Implementations are network clients living outside this crate; loaded
/// handles are cached process-wide and shared between requests, so every
/// method takes `&self` and implementations must be internally synchronized.
pub trait VectorProcessor: Send + Sync {
    /// Name of the backing collection.
    fn collection_name(&self) -> &str;

    /// Stores documents with their embedding vectors.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails.
    fn create(&self, documents: &[Document], embeddings: &[Vec<f32>]) -> Result<()>;

    /// True if a document with the given id is already stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend lookup fails.
    fn text_exists(&self, id: &str) -> Result<bool>;

    /// Deletes documents by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend delete fails.
    fn delete_by_ids(&self, ids: &[String]) -> Result<()>;

    /// Deletes every document whose metadata field equals `value`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend delete fails.
    fn delete_by_metadata_field(&self, key: &str, value: &str) -> Result<()>;

    /// Similarity search against the collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend query fails.
    fn search_by_vector(&self, query_vector: &[f32], top_k: usize) -> Result<Vec<Document>>;

    /// Full-text search against the collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend query fails.
    fn search_by_full_text(&self, query: &str, top_k: usize) -> Result<Vec<Document>>;

    /// Drops the whole collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend delete fails.
    fn delete(&self) -> Result<()>;
}
