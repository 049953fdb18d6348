//! Topic normalization configuration.

use serde::{Deserialize, Serialize};

use crate::error::TopicsError;

/// Master configuration for topic normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicsConfig {
    /// Clustering settings
    #[serde(default)]
    pub clustering: ClusteringConfig,

    /// Naming settings
    #[serde(default)]
    pub naming: NamingConfig,

    /// Topic mapping settings
    #[serde(default)]
    pub mapping: MappingConfig,
}

impl TopicsConfig {
    /// Validate all sections.
    pub fn validate(&self) -> Result<(), TopicsError> {
        self.clustering
            .validate()
            .and_then(|_| self.naming.validate())
            .and_then(|_| self.mapping.validate())
            .map_err(TopicsError::InvalidConfig)
    }
}

/// Clustering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusteringConfig {
    /// Desired number of normalized topics
    #[serde(default = "default_target_count")]
    pub target_count: usize,

    /// Seed for k-means++ initialisation
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Number of k-means restarts per candidate k
    #[serde(default = "default_n_init")]
    pub n_init: usize,

    /// Maximum Lloyd iterations per restart
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Minimum subtopic length in characters
    #[serde(default = "default_min_subtopic_length")]
    pub min_subtopic_length: usize,

    /// Maximum subtopic length in characters
    #[serde(default = "default_max_subtopic_length")]
    pub max_subtopic_length: usize,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            target_count: default_target_count(),
            seed: default_seed(),
            n_init: default_n_init(),
            max_iterations: default_max_iterations(),
            min_subtopic_length: default_min_subtopic_length(),
            max_subtopic_length: default_max_subtopic_length(),
        }
    }
}

impl ClusteringConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.target_count == 0 {
            return Err("target_count must be > 0".to_string());
        }
        if self.n_init == 0 {
            return Err("n_init must be > 0".to_string());
        }
        if self.max_iterations == 0 {
            return Err("max_iterations must be > 0".to_string());
        }
        if self.min_subtopic_length > self.max_subtopic_length {
            return Err(format!(
                "min_subtopic_length ({}) exceeds max_subtopic_length ({})",
                self.min_subtopic_length, self.max_subtopic_length
            ));
        }
        Ok(())
    }
}

fn default_target_count() -> usize {
    10
}
fn default_seed() -> u64 {
    42
}
fn default_n_init() -> usize {
    10
}
fn default_max_iterations() -> usize {
    300
}
fn default_min_subtopic_length() -> usize {
    2
}
fn default_max_subtopic_length() -> usize {
    100
}

/// Topic naming configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamingConfig {
    /// Whether to ask the naming assistant at all
    #[serde(default = "default_true")]
    pub use_assistant: bool,

    /// Longest accepted assistant reply, in words
    #[serde(default = "default_max_words")]
    pub max_words: usize,

    /// Number of frequent words joined by the fallback namer
    #[serde(default = "default_fallback_words")]
    pub fallback_words: usize,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            use_assistant: default_true(),
            max_words: default_max_words(),
            fallback_words: default_fallback_words(),
        }
    }
}

impl NamingConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_words == 0 {
            return Err("max_words must be > 0".to_string());
        }
        if self.fallback_words == 0 {
            return Err("fallback_words must be > 0".to_string());
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}
fn default_max_words() -> usize {
    6
}
fn default_fallback_words() -> usize {
    3
}

/// Topic mapping configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingConfig {
    /// Minimum cosine similarity to adopt the nearest key's topic
    #[serde(default = "default_mapping_threshold")]
    pub similarity_threshold: f32,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_mapping_threshold(),
        }
    }
}

impl MappingConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(format!(
                "similarity_threshold must be 0.0-1.0, got {}",
                self.similarity_threshold
            ));
        }
        Ok(())
    }
}

fn default_mapping_threshold() -> f32 {
    0.6
}
