//! Pipeline error types.

use thiserror::Error;

/// Errors surfaced while configuring the pipeline.
///
/// Running the pipeline itself never fails: embedding and naming failures
/// degrade to lexical fallbacks inside the components.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Settings could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// Settings loaded but hold invalid values
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Topics(#[from] quiz_topics::TopicsError),

    #[error(transparent)]
    Dedup(#[from] quiz_dedup::DedupError),

    /// A global tracing subscriber is already installed
    #[error("Logging error: {0}")]
    Logging(String),
}
