//! Topic error types.

use thiserror::Error;

/// Errors that can occur while normalizing topics.
///
/// These never leave the clusterer: every variant routes the run to the
/// lexical fallback.
#[derive(Debug, Error)]
pub enum TopicsError {
    /// Embedding provider failed
    #[error("Embedding error: {0}")]
    Embedding(#[from] quiz_embeddings::EmbeddingError),

    /// Clustering could not produce a partition
    #[error("Clustering error: {0}")]
    Clustering(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
