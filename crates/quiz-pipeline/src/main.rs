//! Quiz Normalizer
//!
//! Groups noisy subtopic labels into named topics and removes duplicate
//! quiz questions.
//!
//! # Usage
//!
//! ```bash
//! quiz-normalizer normalize --subtopics subtopics.json [--target-count N]
//! quiz-normalizer dedup --questions questions.json [--report | --near]
//! quiz-normalizer run --subtopics subtopics.json --questions questions.json
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/quiz-normalizer/config.toml)
//! 3. File given with --config
//! 4. Environment variables (QUIZ_*)
//! 5. CLI flags

use anyhow::Result;
use clap::Parser;

use quiz_pipeline::{handle_dedup, handle_normalize, handle_run, Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.config.as_deref();
    let log_level = cli.log_level.as_deref();

    match cli.command {
        Commands::Normalize {
            subtopics,
            target_count,
        } => {
            handle_normalize(config, log_level, &subtopics, target_count)?;
        }
        Commands::Dedup {
            questions,
            threshold,
            report,
            near,
        } => {
            handle_dedup(config, log_level, &questions, threshold, report, near)?;
        }
        Commands::Run {
            subtopics,
            questions,
            max_per_topic,
        } => {
            handle_run(config, log_level, &subtopics, &questions, max_per_topic)?;
        }
    }

    Ok(())
}
