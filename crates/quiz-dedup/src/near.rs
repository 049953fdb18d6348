//! Near-duplicate analysis.
//!
//! Pairs that are similar but fall short of the duplicate threshold are
//! worth reviewing by hand. Each pair is annotated with why it was not
//! merged.

use quiz_topics::jaccard_similarity;
use quiz_types::Question;
use serde::Serialize;
use tracing::debug;

use crate::detector::DuplicateDetector;

/// Answers below this Jaccard similarity count as different.
const ANSWER_AGREEMENT: f32 = 0.7;

/// Why a near-duplicate pair was kept apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NearDuplicateReason {
    DifferentQuestionType,
    DifferentTopic,
    DifferentAnswers,
    /// Nothing obvious separates them besides the similarity score.
    HighSemanticSimilarity,
}

/// A pair of questions just below the duplicate threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearDuplicate {
    #[serde(rename = "question1_id")]
    pub first: String,
    #[serde(rename = "question2_id")]
    pub second: String,
    pub similarity: f32,
    pub reasons: Vec<NearDuplicateReason>,
}

impl DuplicateDetector {
    /// Near duplicates using the configured lower bound.
    pub fn find_near_duplicates(&self, questions: &[Question]) -> Vec<NearDuplicate> {
        self.find_near_duplicates_above(questions, self.config().near_duplicate_threshold)
    }

    /// Pairs `(i, j)`, `i < j`, with `lower <= similarity < similarity_threshold`.
    pub fn find_near_duplicates_above(
        &self,
        questions: &[Question],
        lower: f32,
    ) -> Vec<NearDuplicate> {
        if questions.len() < 2 {
            return Vec::new();
        }

        let matrix = self.similarity_matrix(questions);
        let upper = self.config().similarity_threshold;
        let mut pairs = Vec::new();

        for i in 0..questions.len() {
            for j in (i + 1)..questions.len() {
                let similarity = matrix.get(i, j);
                if similarity >= lower && similarity < upper {
                    pairs.push(NearDuplicate {
                        first: questions[i].question_id.clone(),
                        second: questions[j].question_id.clone(),
                        similarity,
                        reasons: reasons(&questions[i], &questions[j]),
                    });
                }
            }
        }

        debug!(
            questions = questions.len(),
            pairs = pairs.len(),
            lower,
            upper,
            "Near-duplicate scan complete"
        );
        pairs
    }
}

fn reasons(first: &Question, second: &Question) -> Vec<NearDuplicateReason> {
    let mut reasons = Vec::new();

    if first.question_type != second.question_type {
        reasons.push(NearDuplicateReason::DifferentQuestionType);
    }
    if first.topic_or_general() != second.topic_or_general() {
        reasons.push(NearDuplicateReason::DifferentTopic);
    }
    if !first.answer.trim().is_empty()
        && !second.answer.trim().is_empty()
        && jaccard_similarity(&first.answer, &second.answer) < ANSWER_AGREEMENT
    {
        reasons.push(NearDuplicateReason::DifferentAnswers);
    }

    if reasons.is_empty() {
        reasons.push(NearDuplicateReason::HighSemanticSimilarity);
    }
    reasons
}
