//! Deduplication error types.

use thiserror::Error;

/// Errors that can occur while deduplicating questions.
///
/// Embedding failures are recovered inside the detector and selector by
/// switching to lexical similarity; only configuration errors reach callers.
#[derive(Debug, Error)]
pub enum DedupError {
    /// Embedding provider failed
    #[error("Embedding error: {0}")]
    Embedding(#[from] quiz_embeddings::EmbeddingError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
