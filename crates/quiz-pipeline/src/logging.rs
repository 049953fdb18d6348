//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::error::PipelineError;

/// Install a global fmt subscriber writing to stderr.
///
/// `RUST_LOG` takes precedence over `level` when set. Stdout is left free
/// for command output.
pub fn init_tracing(level: &str) -> Result<(), PipelineError> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| PipelineError::Logging(e.to_string()))
}
