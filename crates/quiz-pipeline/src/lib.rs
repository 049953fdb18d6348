//! # quiz-pipeline
//!
//! Wires topic normalization, question deduplication and diversity
//! selection into a single run, with layered settings, tracing setup and
//! the `quiz-normalizer` CLI.
//!
//! # Modules
//!
//! - `cli`: Command-line argument parsing with clap
//! - `commands`: Command implementations (normalize, dedup, run)
//! - `pipeline`: The end-to-end run
//! - `settings`: Layered configuration
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use quiz_embeddings::HashingEmbedder;
//! use quiz_pipeline::{NormalizationPipeline, Settings};
//!
//! let pipeline = NormalizationPipeline::new(
//!     Settings::default(),
//!     Arc::new(HashingEmbedder::default()),
//!     None,
//! )
//! .unwrap();
//! let output = pipeline.run(&["genetics".to_string()], Vec::new());
//! assert_eq!(output.normalization.normalized_topics.len(), 1);
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod settings;

pub use cli::{Cli, Commands};
pub use commands::{
    apply_dedup_overrides, handle_dedup, handle_normalize, handle_run, read_questions,
    read_subtopics,
};
pub use error::PipelineError;
pub use logging::init_tracing;
pub use pipeline::{NormalizationPipeline, PipelineOutput};
pub use settings::{PipelineConfig, Settings};
