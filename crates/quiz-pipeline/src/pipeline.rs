//! End-to-end normalization and deduplication.

use std::sync::Arc;

use quiz_dedup::{DiversitySelector, DuplicateDetector};
use quiz_embeddings::EmbeddingModel;
use quiz_topics::{NamingAssistant, TopicClusterer, TopicMapper};
use quiz_types::{DeduplicationResult, NormalizationResult, Question};
use serde::Serialize;
use tracing::info;

use crate::error::PipelineError;
use crate::settings::Settings;

/// Everything produced by one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineOutput {
    pub normalization: NormalizationResult,
    pub deduplication: DeduplicationResult,
    /// Unique questions capped per normalized topic
    pub selected_questions: Vec<Question>,
}

/// Runs clustering, topic mapping, deduplication and the per-topic cap.
pub struct NormalizationPipeline {
    settings: Settings,
    embedder: Arc<dyn EmbeddingModel>,
    clusterer: TopicClusterer,
    detector: DuplicateDetector,
    selector: DiversitySelector,
}

impl NormalizationPipeline {
    /// Build a pipeline from validated settings.
    pub fn new(
        settings: Settings,
        embedder: Arc<dyn EmbeddingModel>,
        naming: Option<Arc<dyn NamingAssistant>>,
    ) -> Result<Self, PipelineError> {
        settings.validate()?;
        let chunk_size = settings.embedding.chunk_size;

        let mut clusterer = TopicClusterer::new(embedder.clone(), settings.topics.clone())
            .with_chunk_size(chunk_size);
        if let Some(assistant) = naming {
            clusterer = clusterer.with_naming_assistant(assistant);
        }

        let detector = DuplicateDetector::new(embedder.clone(), settings.dedup.clone())
            .with_chunk_size(chunk_size);
        let selector = DiversitySelector::new(embedder.clone(), settings.dedup.diversity.clone())
            .with_chunk_size(chunk_size);

        Ok(Self {
            settings,
            embedder,
            clusterer,
            detector,
            selector,
        })
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Normalize `subtopics`, tag `questions` with their topics, then
    /// deduplicate and cap each topic.
    pub fn run(&self, subtopics: &[String], mut questions: Vec<Question>) -> PipelineOutput {
        let normalization = self.clusterer.normalize(subtopics);

        let mapper = TopicMapper::from_result(
            &normalization,
            self.embedder.clone(),
            &self.settings.topics.mapping,
        )
        .with_chunk_size(self.settings.embedding.chunk_size);
        mapper.map_questions(&mut questions);

        let deduplication = self.detector.detect(questions);
        let selected_questions = self.selector.select_per_topic(
            deduplication.unique_questions.clone(),
            self.settings.pipeline.max_questions_per_topic,
        );

        info!(
            subtopics = subtopics.len(),
            topics = normalization.normalized_topics.len(),
            method = ?normalization.method,
            unique = deduplication.unique_questions.len(),
            selected = selected_questions.len(),
            "Pipeline run complete"
        );

        PipelineOutput {
            normalization,
            deduplication,
            selected_questions,
        }
    }
}
