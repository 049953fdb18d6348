//! Duplicate group types and the deduplication result record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, Serializer};

use crate::question::Question;

/// Which similarity signal drove a deduplication run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMethod {
    /// Cosine similarity over text embeddings
    Embedding,
    /// Embeddings unavailable; word-overlap (Jaccard) estimate
    Fallback,
}

/// A set of questions judged equivalent to a kept representative.
///
/// `members` holds only the suppressed questions; the representative is the
/// earliest question of the set in input order and is not repeated here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateGroup {
    pub representative_id: String,
    #[serde(rename = "member_ids", serialize_with = "serialize_member_ids")]
    pub members: Vec<Question>,
    /// Mean similarity between the representative and its members
    #[serde(rename = "similarity")]
    pub pairwise_similarity: f32,
}

impl DuplicateGroup {
    /// Identifiers of the suppressed members.
    pub fn member_ids(&self) -> Vec<&str> {
        self.members
            .iter()
            .map(|q| q.question_id.as_str())
            .collect()
    }
}

fn serialize_member_ids<S>(members: &[Question], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(members.iter().map(|q| q.question_id.as_str()))
}

/// Aggregate statistics for a deduplication run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeduplicationStatistics {
    pub total_original: usize,
    pub total_unique: usize,
    pub total_duplicates_removed: usize,
    /// removed / original
    pub deduplication_rate: f64,
    /// Mean similarity of removed (representative, duplicate) pairs
    pub average_similarity_score: f64,
    /// Question count per topic before deduplication
    pub topic_distribution_original: BTreeMap<String, usize>,
    /// Question count per topic after deduplication
    pub topic_distribution_unique: BTreeMap<String, usize>,
    /// Mean over topics of kept / original
    pub topic_preservation_rate: f64,
    pub similarity_method: SimilarityMethod,
}

/// Output of one deduplication run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeduplicationResult {
    /// Kept questions in input order, annotated with `duplicate_count`
    pub unique_questions: Vec<Question>,
    pub duplicate_groups: Vec<DuplicateGroup>,
    pub statistics: DeduplicationStatistics,
}

impl DeduplicationResult {
    /// Identifiers of the kept questions.
    pub fn unique_ids(&self) -> Vec<&str> {
        self.unique_questions
            .iter()
            .map(|q| q.question_id.as_str())
            .collect()
    }
}
