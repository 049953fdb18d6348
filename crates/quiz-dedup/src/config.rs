//! Deduplication configuration.

use serde::{Deserialize, Serialize};

use crate::error::DedupError;

/// Master configuration for duplicate detection and diversity selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DedupConfig {
    /// Minimum similarity for two questions to be duplicate candidates
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,

    /// Lower bound for near-duplicate reporting
    #[serde(default = "default_near_duplicate_threshold")]
    pub near_duplicate_threshold: f32,

    /// Secondary "same concept" test
    #[serde(default)]
    pub concept: ConceptConfig,

    /// Diversity selection settings
    #[serde(default)]
    pub diversity: DiversityConfig,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            near_duplicate_threshold: default_near_duplicate_threshold(),
            concept: ConceptConfig::default(),
            diversity: DiversityConfig::default(),
        }
    }
}

impl DedupConfig {
    /// Replace the duplicate threshold, lowering the near-duplicate bound
    /// with it when it would otherwise sit above the new threshold.
    pub fn set_similarity_threshold(&mut self, threshold: f32) {
        self.similarity_threshold = threshold;
        self.near_duplicate_threshold = self.near_duplicate_threshold.min(threshold);
    }

    /// Validate all sections.
    pub fn validate(&self) -> Result<(), DedupError> {
        self.validate_thresholds()
            .and_then(|_| self.concept.validate())
            .and_then(|_| self.diversity.validate())
            .map_err(DedupError::InvalidConfig)
    }

    fn validate_thresholds(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(format!(
                "similarity_threshold must be 0.0-1.0, got {}",
                self.similarity_threshold
            ));
        }
        if !(0.0..=1.0).contains(&self.near_duplicate_threshold) {
            return Err(format!(
                "near_duplicate_threshold must be 0.0-1.0, got {}",
                self.near_duplicate_threshold
            ));
        }
        if self.near_duplicate_threshold > self.similarity_threshold {
            return Err(format!(
                "near_duplicate_threshold ({}) exceeds similarity_threshold ({})",
                self.near_duplicate_threshold, self.similarity_threshold
            ));
        }
        Ok(())
    }
}

fn default_similarity_threshold() -> f32 {
    0.85
}
fn default_near_duplicate_threshold() -> f32 {
    0.75
}

/// Configuration for the secondary duplicate test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptConfig {
    /// Minimum Jaccard similarity between non-empty answers
    #[serde(default = "default_answer_threshold")]
    pub answer_similarity_threshold: f32,

    /// Shared significant keywords needed to call two texts the same concept
    #[serde(default = "default_min_shared_keywords")]
    pub min_shared_keywords: usize,

    /// Words ignored when extracting significant keywords
    #[serde(default = "default_stopwords")]
    pub stopwords: Vec<String>,
}

impl Default for ConceptConfig {
    fn default() -> Self {
        Self {
            answer_similarity_threshold: default_answer_threshold(),
            min_shared_keywords: default_min_shared_keywords(),
            stopwords: default_stopwords(),
        }
    }
}

impl ConceptConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.answer_similarity_threshold) {
            return Err(format!(
                "answer_similarity_threshold must be 0.0-1.0, got {}",
                self.answer_similarity_threshold
            ));
        }
        if self.min_shared_keywords == 0 {
            return Err("min_shared_keywords must be > 0".to_string());
        }
        Ok(())
    }
}

fn default_answer_threshold() -> f32 {
    0.3
}
fn default_min_shared_keywords() -> usize {
    2
}
fn default_stopwords() -> Vec<String> {
    ["the", "and", "is", "in", "to", "of", "a", "that", "it", "with"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Diversity selection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiversityConfig {
    /// A candidate at or above this similarity to any pick is skipped
    #[serde(default = "default_diversity_threshold")]
    pub diversity_threshold: f32,

    /// Cap applied per normalized topic
    #[serde(default = "default_max_per_topic")]
    pub max_per_topic: usize,
}

impl Default for DiversityConfig {
    fn default() -> Self {
        Self {
            diversity_threshold: default_diversity_threshold(),
            max_per_topic: default_max_per_topic(),
        }
    }
}

impl DiversityConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.diversity_threshold) {
            return Err(format!(
                "diversity_threshold must be 0.0-1.0, got {}",
                self.diversity_threshold
            ));
        }
        if self.max_per_topic == 0 {
            return Err("max_per_topic must be > 0".to_string());
        }
        Ok(())
    }
}

fn default_diversity_threshold() -> f32 {
    0.7
}
fn default_max_per_topic() -> usize {
    3
}
