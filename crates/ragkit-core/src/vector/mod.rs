//! Vector store layer: backend dispatch, processor caching, and the
//! dataset-scoped store facade.

mod backend;
mod processor;
mod registry;
mod store;

pub use backend::VectorBackend;
pub use processor::VectorProcessor;
pub use registry::{VectorFactoryRegistry, VectorProcessorFactory};
pub use store::{processor_cache, resolve_backend, VectorStore, DEFAULT_ATTRIBUTES};
