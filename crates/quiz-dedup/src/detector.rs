//! Duplicate question detection.
//!
//! Questions are scanned in input order. Each question not yet claimed is
//! kept, and claims every later unclaimed question whose similarity reaches
//! the threshold and which passes the secondary duplicate test. The earliest
//! question of a duplicate set is therefore always its representative.

use std::sync::Arc;

use quiz_embeddings::{EmbeddingModel, DEFAULT_CHUNK_SIZE};
use quiz_types::{DeduplicationResult, DuplicateGroup, Question, SimilarityMethod};
use tracing::info;

use crate::concept::is_duplicate;
use crate::config::DedupConfig;
use crate::matrix::SimilarityMatrix;
use crate::stats::calculate_statistics;

/// Collapses a question pool into unique questions and duplicate groups.
pub struct DuplicateDetector {
    embedder: Arc<dyn EmbeddingModel>,
    config: DedupConfig,
    chunk_size: usize,
}

impl DuplicateDetector {
    /// Create a detector.
    pub fn new(embedder: Arc<dyn EmbeddingModel>, config: DedupConfig) -> Self {
        Self {
            embedder,
            config,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Set the maximum number of texts per embedding call.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Get the configuration.
    pub fn config(&self) -> &DedupConfig {
        &self.config
    }

    /// Deduplicate with the configured threshold.
    pub fn detect(&self, questions: Vec<Question>) -> DeduplicationResult {
        self.detect_with_threshold(questions, self.config.similarity_threshold)
    }

    /// Deduplicate with an explicit similarity threshold.
    pub fn detect_with_threshold(
        &self,
        questions: Vec<Question>,
        threshold: f32,
    ) -> DeduplicationResult {
        if questions.len() <= 1 {
            let statistics =
                calculate_statistics(&questions, &questions, &[], SimilarityMethod::Embedding);
            return DeduplicationResult {
                unique_questions: questions,
                duplicate_groups: Vec::new(),
                statistics,
            };
        }

        let matrix = self.similarity_matrix(&questions);
        self.detect_in_matrix(questions, &matrix, threshold)
    }

    /// Deduplicate against a precomputed similarity matrix.
    pub fn detect_in_matrix(
        &self,
        questions: Vec<Question>,
        matrix: &SimilarityMatrix,
        threshold: f32,
    ) -> DeduplicationResult {
        let n = questions.len();
        let mut processed = vec![false; n];
        // (kept index, [(duplicate index, similarity)])
        let mut kept: Vec<(usize, Vec<(usize, f32)>)> = Vec::new();

        for i in 0..n {
            if processed[i] {
                continue;
            }
            processed[i] = true;

            let mut duplicates = Vec::new();
            for j in (i + 1)..n {
                if processed[j] {
                    continue;
                }
                let similarity = matrix.get(i, j);
                if similarity >= threshold
                    && is_duplicate(&questions[i], &questions[j], &self.config.concept)
                {
                    processed[j] = true;
                    duplicates.push((j, similarity));
                }
            }
            kept.push((i, duplicates));
        }

        let mut unique_questions = Vec::with_capacity(kept.len());
        let mut duplicate_groups = Vec::new();
        let mut removed_similarities = Vec::new();

        for (index, duplicates) in &kept {
            let mut question = questions[*index].clone();
            question.duplicate_count = duplicates.len();
            unique_questions.push(question);

            if duplicates.is_empty() {
                continue;
            }

            let similarities: Vec<f32> = duplicates.iter().map(|(_, s)| *s).collect();
            removed_similarities.extend_from_slice(&similarities);

            duplicate_groups.push(DuplicateGroup {
                representative_id: questions[*index].question_id.clone(),
                members: duplicates
                    .iter()
                    .map(|(j, _)| questions[*j].clone())
                    .collect(),
                pairwise_similarity: similarities.iter().sum::<f32>() / similarities.len() as f32,
            });
        }

        let statistics = calculate_statistics(
            &questions,
            &unique_questions,
            &removed_similarities,
            matrix.method(),
        );

        info!(
            original = statistics.total_original,
            unique = statistics.total_unique,
            groups = duplicate_groups.len(),
            method = ?statistics.similarity_method,
            "Deduplication complete"
        );

        DeduplicationResult {
            unique_questions,
            duplicate_groups,
            statistics,
        }
    }

    pub(crate) fn similarity_matrix(&self, questions: &[Question]) -> SimilarityMatrix {
        SimilarityMatrix::build(questions, self.embedder.as_ref(), self.chunk_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_embeddings::{Embedding, EmbeddingError, HashingEmbedder, ModelInfo};
    use quiz_types::QuestionType;

    struct FailingEmbedder {
        info: ModelInfo,
    }

    impl EmbeddingModel for FailingEmbedder {
        fn info(&self) -> &ModelInfo {
            &self.info
        }

        fn embed(&self, _text: &str) -> Result<Embedding, EmbeddingError> {
            Err(EmbeddingError::Unavailable("offline".to_string()))
        }
    }

    fn detector() -> DuplicateDetector {
        DuplicateDetector::new(Arc::new(HashingEmbedder::default()), DedupConfig::default())
    }

    fn photosynthesis(id: &str) -> Question {
        Question::new(
            id,
            "What process do plants use to convert light into chemical energy?",
            "photosynthesis",
            QuestionType::ShortAnswer,
        )
        .with_subtopic("photosynthesis")
    }

    #[test]
    fn test_identical_questions_collapse() {
        let questions: Vec<Question> = (1..=5).map(|i| photosynthesis(&format!("q{i}"))).collect();
        let result = detector().detect(questions);

        assert_eq!(result.unique_ids(), vec!["q1"]);
        assert_eq!(result.unique_questions[0].duplicate_count, 4);
        assert_eq!(result.duplicate_groups.len(), 1);
        let group = &result.duplicate_groups[0];
        assert_eq!(group.representative_id, "q1");
        assert_eq!(group.member_ids(), vec!["q2", "q3", "q4", "q5"]);
        assert!((result.statistics.deduplication_rate - 0.8).abs() < 1e-9);
        assert_eq!(result.statistics.similarity_method, SimilarityMethod::Embedding);
    }

    #[test]
    fn test_unrelated_questions_kept() {
        let questions = vec![
            Question::new("q1", "Define osmosis.", "", QuestionType::ShortAnswer)
                .with_embedding(vec![1.0, 0.0, 0.0]),
            Question::new("q2", "Who wrote Hamlet?", "", QuestionType::ShortAnswer)
                .with_embedding(vec![0.0, 1.0, 0.0]),
            Question::new("q3", "What is 2 + 2?", "", QuestionType::ShortAnswer)
                .with_embedding(vec![0.0, 0.0, 1.0]),
        ];
        let result = detector().detect(questions);
        assert_eq!(result.unique_questions.len(), 3);
        assert!(result.duplicate_groups.is_empty());
        assert_eq!(result.statistics.deduplication_rate, 0.0);
    }

    #[test]
    fn test_single_question_unchanged() {
        let result = detector().detect(vec![photosynthesis("q1")]);
        assert_eq!(result.unique_ids(), vec!["q1"]);
        assert!(result.duplicate_groups.is_empty());

        let result = detector().detect(Vec::new());
        assert!(result.unique_questions.is_empty());
        assert_eq!(result.statistics.total_original, 0);
    }

    #[test]
    fn test_different_types_not_merged() {
        let mut mcq = photosynthesis("q2");
        mcq.question_type = QuestionType::Mcq;
        let result = detector().detect(vec![photosynthesis("q1"), mcq]);
        assert_eq!(result.unique_questions.len(), 2);
    }

    #[test]
    fn test_idempotent() {
        let mut questions: Vec<Question> = (1..=3).map(|i| photosynthesis(&format!("q{i}"))).collect();
        questions.push(
            Question::new("q4", "Who wrote Hamlet?", "Shakespeare", QuestionType::ShortAnswer)
                .with_subtopic("literature"),
        );
        let first = detector().detect(questions);
        assert_eq!(first.unique_ids(), vec!["q1", "q4"]);

        let second = detector().detect(first.unique_questions.clone());
        assert_eq!(second.unique_ids(), vec!["q1", "q4"]);
        assert!(second.duplicate_groups.is_empty());
    }

    #[test]
    fn test_provider_failure_uses_fallback() {
        let detector = DuplicateDetector::new(
            Arc::new(FailingEmbedder {
                info: ModelInfo {
                    name: "failing".to_string(),
                    dimension: 8,
                },
            }),
            DedupConfig::default(),
        );
        let questions: Vec<Question> = (1..=3).map(|i| photosynthesis(&format!("q{i}"))).collect();
        let result = detector.detect(questions);
        assert_eq!(result.statistics.similarity_method, SimilarityMethod::Fallback);
        assert_eq!(result.unique_ids(), vec!["q1"]);
    }

    #[test]
    fn test_representative_is_lowest_index() {
        let questions: Vec<Question> = (0..3).map(|i| photosynthesis(&format!("q{i}"))).collect();
        // q0~q1 and q1~q2 are above threshold, q0~q2 is not
        let matrix = SimilarityMatrix::from_values(
            vec![
                vec![1.0, 0.9, 0.5],
                vec![0.9, 1.0, 0.9],
                vec![0.5, 0.9, 1.0],
            ],
            SimilarityMethod::Embedding,
        );
        let result = detector().detect_in_matrix(questions, &matrix, 0.85);
        assert_eq!(result.unique_ids(), vec!["q0", "q2"]);
        assert_eq!(result.duplicate_groups[0].representative_id, "q0");
        assert_eq!(result.duplicate_groups[0].member_ids(), vec!["q1"]);
        assert!((result.duplicate_groups[0].pairwise_similarity - 0.9).abs() < 1e-6);
        assert!((result.statistics.average_similarity_score - 0.9).abs() < 1e-6);
    }
}
