//! CLI argument parsing for the quiz normalizer.
//!
//! CLI flags override all other config sources.

use clap::{Parser, Subcommand};

/// Quiz normalizer
///
/// Groups noisy subtopic labels into named topics and removes duplicate
/// questions. Input files are JSON; results are printed to stdout as JSON.
#[derive(Parser, Debug)]
#[command(name = "quiz-normalizer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/quiz-normalizer/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Normalizer commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Cluster subtopic labels into normalized topics
    Normalize {
        /// JSON file holding an array of subtopic strings
        #[arg(short, long)]
        subtopics: String,

        /// Override the desired number of topics
        #[arg(short, long)]
        target_count: Option<usize>,
    },

    /// Remove duplicate questions
    Dedup {
        /// JSON file holding an array of questions
        #[arg(short, long)]
        questions: String,

        /// Override the duplicate similarity threshold
        #[arg(long)]
        threshold: Option<f32>,

        /// Print a summary report instead of the full result
        #[arg(long)]
        report: bool,

        /// Print pairs just below the duplicate threshold instead
        #[arg(long, conflicts_with = "report")]
        near: bool,
    },

    /// Normalize topics, tag questions, deduplicate and cap per topic
    Run {
        /// JSON file holding an array of subtopic strings
        #[arg(short, long)]
        subtopics: String,

        /// JSON file holding an array of questions
        #[arg(short, long)]
        questions: String,

        /// Override the per-topic question cap
        #[arg(long)]
        max_per_topic: Option<usize>,
    },
}
