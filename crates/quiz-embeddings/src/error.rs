//! Embedding error types.

use thiserror::Error;

/// Errors that can occur during embedding operations.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// The provider could not be reached or refused the request
    #[error("Embedding provider unavailable: {0}")]
    Unavailable(String),

    /// The provider did not answer in time
    #[error("Embedding request timed out after {0} ms")]
    Timeout(u64),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Dimension mismatch
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Adapter returned a different number of vectors than texts sent
    #[error("Batch length mismatch: sent {sent} texts, received {received} vectors")]
    BatchLengthMismatch { sent: usize, received: usize },
}
