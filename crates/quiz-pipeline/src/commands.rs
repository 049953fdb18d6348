//! Command implementations for the quiz normalizer CLI.
//!
//! Every command loads settings, applies CLI overrides, initializes logging
//! on stderr, and prints its JSON result on stdout.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use quiz_dedup::{DeduplicationReport, DuplicateDetector};
use quiz_embeddings::{EmbeddingModel, HashingEmbedder};
use quiz_topics::TopicClusterer;
use quiz_types::Question;

use crate::logging::init_tracing;
use crate::pipeline::NormalizationPipeline;
use crate::settings::Settings;

/// Read a JSON array of subtopic labels.
pub fn read_subtopics(path: &Path) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read subtopics from {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("{} is not a JSON array of strings", path.display()))
}

/// Read a JSON array of questions.
///
/// Every element is parsed and validated like [`Question::from_value`], so a
/// blank id or empty text rejects the whole file.
pub fn read_questions(path: &Path) -> Result<Vec<Question>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read questions from {}", path.display()))?;
    let values: Vec<serde_json::Value> = serde_json::from_str(&contents)
        .with_context(|| format!("{} is not a JSON array of questions", path.display()))?;

    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            Question::from_value(value).with_context(|| {
                format!("Invalid question at index {index} in {}", path.display())
            })
        })
        .collect()
}

/// Load settings, apply the log level override and start logging.
fn prepare(config_path: Option<&str>, log_level: Option<&str>) -> Result<Settings> {
    let mut settings = Settings::load(config_path).context("Failed to load settings")?;
    if let Some(level) = log_level {
        settings.log_level = level.to_string();
    }
    init_tracing(&settings.log_level).context("Failed to set tracing subscriber")?;
    Ok(settings)
}

fn embedder() -> Arc<dyn EmbeddingModel> {
    Arc::new(HashingEmbedder::default())
}

fn emit<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

/// Apply the `dedup --threshold` override and re-validate.
pub fn apply_dedup_overrides(settings: &mut Settings, threshold: Option<f32>) -> Result<()> {
    if let Some(threshold) = threshold {
        settings.dedup.set_similarity_threshold(threshold);
    }
    settings.validate()?;
    Ok(())
}

/// Cluster subtopic labels and print the normalization result.
pub fn handle_normalize(
    config_path: Option<&str>,
    log_level: Option<&str>,
    subtopics_path: &str,
    target_count: Option<usize>,
) -> Result<()> {
    let mut settings = prepare(config_path, log_level)?;
    if let Some(target) = target_count {
        settings.topics.clustering.target_count = target;
    }
    settings.validate()?;

    let subtopics = read_subtopics(Path::new(subtopics_path))?;
    info!(count = subtopics.len(), "Normalizing subtopics");

    let clusterer = TopicClusterer::new(embedder(), settings.topics.clone())
        .with_chunk_size(settings.embedding.chunk_size);
    emit(&clusterer.normalize(&subtopics))
}

/// Deduplicate questions and print the result, a report, or near duplicates.
pub fn handle_dedup(
    config_path: Option<&str>,
    log_level: Option<&str>,
    questions_path: &str,
    threshold: Option<f32>,
    report: bool,
    near: bool,
) -> Result<()> {
    let mut settings = prepare(config_path, log_level)?;
    apply_dedup_overrides(&mut settings, threshold)?;

    let questions = read_questions(Path::new(questions_path))?;
    info!(count = questions.len(), "Deduplicating questions");

    let detector = DuplicateDetector::new(embedder(), settings.dedup.clone())
        .with_chunk_size(settings.embedding.chunk_size);

    if near {
        return emit(&detector.find_near_duplicates(&questions));
    }

    let result = detector.detect(questions);
    if report {
        emit(&DeduplicationReport::from_result(&result))
    } else {
        emit(&result)
    }
}

/// Run the full pipeline and print its output.
pub fn handle_run(
    config_path: Option<&str>,
    log_level: Option<&str>,
    subtopics_path: &str,
    questions_path: &str,
    max_per_topic: Option<usize>,
) -> Result<()> {
    let mut settings = prepare(config_path, log_level)?;
    if let Some(max) = max_per_topic {
        settings.pipeline.max_questions_per_topic = max;
    }

    let subtopics = read_subtopics(Path::new(subtopics_path))?;
    let questions = read_questions(Path::new(questions_path))?;

    let pipeline = NormalizationPipeline::new(settings, embedder(), None)?;
    emit(&pipeline.run(&subtopics, questions))
}
