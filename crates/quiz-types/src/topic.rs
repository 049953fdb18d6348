//! Normalized topic types and the normalization result record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Mapping from a cleaned subtopic to the name of its normalized topic.
pub type TopicMapping = BTreeMap<String, String>;

/// A normalized topic: a named cluster of subtopics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTopic {
    /// Identifier, `topic_001` style
    pub topic_id: String,
    /// Human-readable name, unique within one run
    #[serde(rename = "topic_name")]
    pub name: String,
    /// Subtopics belonging to this topic
    #[serde(rename = "subtopics")]
    pub members: Vec<String>,
    /// Number of member subtopics
    pub subtopic_count: usize,
    /// Member closest to the cluster centre
    #[serde(rename = "representative_subtopic")]
    pub representative: String,
    /// Mean pairwise similarity of members (0.0 - 1.0)
    pub cohesion_score: f32,
    /// Mean number of whitespace separated words per member
    #[serde(default)]
    pub average_word_count: f64,
    /// Shortest member length in characters
    #[serde(default)]
    pub min_length: usize,
    /// Longest member length in characters
    #[serde(default)]
    pub max_length: usize,
}

impl NormalizedTopic {
    /// Create a topic.
    ///
    /// `subtopic_count` and the member word/length statistics are derived
    /// from `members`; all of them are zero for an empty member list.
    pub fn new(
        topic_id: impl Into<String>,
        name: impl Into<String>,
        members: Vec<String>,
        representative: impl Into<String>,
        cohesion_score: f32,
    ) -> Self {
        let subtopic_count = members.len();
        let average_word_count = if members.is_empty() {
            0.0
        } else {
            let words: usize = members.iter().map(|m| m.split_whitespace().count()).sum();
            words as f64 / subtopic_count as f64
        };
        let lengths = members.iter().map(|m| m.chars().count());
        let min_length = lengths.clone().min().unwrap_or(0);
        let max_length = lengths.max().unwrap_or(0);

        Self {
            topic_id: topic_id.into(),
            name: name.into(),
            members,
            subtopic_count,
            representative: representative.into(),
            cohesion_score: cohesion_score.clamp(0.0, 1.0),
            average_word_count,
            min_length,
            max_length,
        }
    }

    /// Format the identifier for the topic at 0-based `index`.
    pub fn id_for_index(index: usize) -> String {
        format!("topic_{:03}", index + 1)
    }
}

/// How a normalization run produced its topics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationMethod {
    /// No subtopics were supplied
    Empty,
    /// Too few subtopics to cluster; each became its own topic
    OneToOne,
    /// Embedding clustering with automatic cluster count
    EmbeddingClustering,
    /// Embeddings or clustering failed; lexical frequency banding was used
    LexicalFallback,
}

/// Coarse quality verdict for a normalization run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NormalizationQuality {
    #[serde(rename = "No Data")]
    NoData,
    #[serde(rename = "Perfect (1:1 mapping)")]
    Perfect,
    Excellent,
    Good,
    Fair,
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
    Fallback,
}

impl NormalizationQuality {
    /// Grade a clustered run from coverage, balance and cohesion (all 0.0 - 1.0).
    pub fn assess(coverage: f64, balance: f64, cohesion: f64) -> Self {
        let score = coverage * 0.4 + balance * 0.3 + cohesion * 0.3;
        if score >= 0.8 {
            NormalizationQuality::Excellent
        } else if score >= 0.7 {
            NormalizationQuality::Good
        } else if score >= 0.6 {
            NormalizationQuality::Fair
        } else {
            NormalizationQuality::NeedsImprovement
        }
    }
}

/// Aggregate statistics for a normalization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationStatistics {
    pub total_original_subtopics: usize,
    pub total_normalized_topics: usize,
    pub coverage_percentage: f64,
    pub average_subtopics_per_topic: f64,
    pub subtopic_distribution_std: f64,
    /// 1.0 = perfectly even topic sizes
    pub balance_score: f64,
    pub average_cohesion_score: f64,
    pub normalization_quality: NormalizationQuality,
}

/// Output of one topic normalization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationResult {
    pub normalized_topics: Vec<NormalizedTopic>,
    pub topic_mapping: TopicMapping,
    /// Cleaned, deduplicated input subtopics in input order
    pub original_subtopics: Vec<String>,
    pub statistics: NormalizationStatistics,
    pub method: NormalizationMethod,
}

impl NormalizationResult {
    /// Look up the topic name for a subtopic in the mapping.
    pub fn topic_for(&self, subtopic: &str) -> Option<&str> {
        self.topic_mapping.get(subtopic).map(String::as_str)
    }

    /// Names of all normalized topics, in topic order.
    pub fn topic_names(&self) -> Vec<&str> {
        self.normalized_topics
            .iter()
            .map(|t| t.name.as_str())
            .collect()
    }

    /// Find a topic by name.
    pub fn topic(&self, name: &str) -> Option<&NormalizedTopic> {
        self.normalized_topics.iter().find(|t| t.name == name)
    }
}
