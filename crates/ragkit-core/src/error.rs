//! Error types for `RagKit`.
//!
//! This module provides a unified error type for all `RagKit` operations.
//! Error codes follow the pattern `RAG-XXX` for easy debugging.

use thiserror::Error;

/// Result type alias for `RagKit` operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in `RagKit` operations.
///
/// Each variant includes a descriptive error message suitable for end-users.
#[derive(Error, Debug)]
pub enum Error {
    /// Model provider rejected the credentials (RAG-001).
    ///
    /// Rerank callers treat this as "no runner available" and fall back to
    /// passthrough; embedding and vector-store callers treat it as fatal.
    #[error("[RAG-001] Authorization failed loading model '{model}' from provider '{provider}'")]
    Unauthorized {
        /// Provider that rejected the request.
        provider: String,
        /// Model that was being loaded.
        model: String,
    },

    /// Vector store backend tag is not in the supported set (RAG-002).
    #[error("[RAG-002] Vector store backend '{0}' is not supported")]
    UnsupportedBackend(String),

    /// Configuration error (RAG-003).
    #[error("[RAG-003] Configuration error: {0}")]
    Config(String),

    /// Model loading failed for a non-authorization reason (RAG-004).
    ///
    /// Transient by nature: nothing is cached, the next request retries.
    #[error("[RAG-004] Model loading failed: {0}")]
    ModelLoad(String),

    /// Vector store operation failed (RAG-005).
    #[error("[RAG-005] Vector store error: {0}")]
    VectorStore(String),

    /// Rerank invocation failed (RAG-006).
    #[error("[RAG-006] Rerank error: {0}")]
    Rerank(String),
}

impl Error {
    /// Returns the error code (e.g., "RAG-001").
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized { .. } => "RAG-001",
            Self::UnsupportedBackend(_) => "RAG-002",
            Self::Config(_) => "RAG-003",
            Self::ModelLoad(_) => "RAG-004",
            Self::VectorStore(_) => "RAG-005",
            Self::Rerank(_) => "RAG-006",
        }
    }

    /// Returns true if this error is recoverable by retrying the request.
    ///
    /// Authorization and unsupported-backend failures require operator
    /// intervention; everything else may succeed on the next attempt.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Unauthorized { .. } | Self::UnsupportedBackend(_))
    }
}
