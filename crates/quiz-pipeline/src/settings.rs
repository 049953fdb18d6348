//! Layered pipeline settings.

use std::path::PathBuf;

use config::{Config, Environment, File};
use directories::ProjectDirs;
use quiz_dedup::DedupConfig;
use quiz_embeddings::EmbeddingConfig;
use quiz_topics::TopicsConfig;
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

const APP_NAME: &str = "quiz-normalizer";

/// Pipeline stage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum questions kept per normalized topic after deduplication
    #[serde(default = "default_max_questions_per_topic")]
    pub max_questions_per_topic: usize,
}

fn default_max_questions_per_topic() -> usize {
    3
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_questions_per_topic: default_max_questions_per_topic(),
        }
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub embedding: EmbeddingConfig,

    #[serde(default)]
    pub topics: TopicsConfig,

    #[serde(default)]
    pub dedup: DedupConfig,

    #[serde(default)]
    pub pipeline: PipelineConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            embedding: EmbeddingConfig::default(),
            topics: TopicsConfig::default(),
            dedup: DedupConfig::default(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/quiz-normalizer/config.toml)
    /// 3. Explicit config file (optional)
    /// 4. Environment variables (QUIZ_*, `__` between nested keys)
    ///
    /// The result is validated before it is returned.
    pub fn load(config_path: Option<&str>) -> Result<Self, PipelineError> {
        let config_dir = ProjectDirs::from("", "", APP_NAME)
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("log_level", default_log_level())
            .map_err(|e| PipelineError::Config(e.to_string()))?
            .set_default(
                "pipeline.max_questions_per_topic",
                default_max_questions_per_topic() as i64,
            )
            .map_err(|e| PipelineError::Config(e.to_string()))?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Format: QUIZ_LOG_LEVEL, QUIZ_DEDUP__SIMILARITY_THRESHOLD, ...
        builder = builder.add_source(
            Environment::with_prefix("QUIZ")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings: Settings = builder
            .build()
            .map_err(|e| PipelineError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<(), PipelineError> {
        self.embedding
            .validate()
            .map_err(PipelineError::InvalidConfig)?;
        self.topics.validate()?;
        self.dedup.validate()?;
        if self.pipeline.max_questions_per_topic == 0 {
            return Err(PipelineError::InvalidConfig(
                "max_questions_per_topic must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
