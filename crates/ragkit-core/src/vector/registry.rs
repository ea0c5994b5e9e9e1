//! Factory registry dispatching backend tags to processor constructors.

use super::backend::VectorBackend;
use super::processor::VectorProcessor;
use crate::dataset::Dataset;
use crate::embedding::CachedEmbedder;
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Constructs processor handles for one backend family.
pub trait VectorProcessorFactory: Send + Sync {
    /// Connects to the backend and returns a processor bound to the
    /// dataset's collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or collection setup fails.
    fn init(
        &self,
        dataset: &Dataset,
        attributes: &[String],
        embedder: Arc<CachedEmbedder>,
    ) -> Result<Arc<dyn VectorProcessor>>;
}

/// Table mapping backend tags to their factories.
///
/// Built once at startup by the host (backend clients live outside this
/// crate) and read-only afterwards. A tag without an entry is rejected the
/// same way an unknown tag string is: `Error::UnsupportedBackend`.
#[derive(Default)]
pub struct VectorFactoryRegistry {
    table: HashMap<VectorBackend, Box<dyn VectorProcessorFactory>>,
}

impl VectorFactoryRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a factory for a backend, replacing any previous entry.
    #[must_use]
    pub fn with(
        mut self,
        backend: VectorBackend,
        factory: Box<dyn VectorProcessorFactory>,
    ) -> Self {
        self.table.insert(backend, factory);
        self
    }

    /// Looks up the factory for a backend.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnsupportedBackend` when no factory is registered.
    pub fn factory(&self, backend: VectorBackend) -> Result<&dyn VectorProcessorFactory> {
        self.table
            .get(&backend)
            .map(AsRef::as_ref)
            .ok_or_else(|| Error::UnsupportedBackend(backend.as_str().to_string()))
    }

    /// Backends with a registered factory.
    #[must_use]
    pub fn registered(&self) -> Vec<VectorBackend> {
        VectorBackend::ALL
            .into_iter()
            .filter(|backend| self.table.contains_key(backend))
            .collect()
    }
}
