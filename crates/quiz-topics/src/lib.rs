//! # quiz-topics
//!
//! Semantic topic normalization for the quiz normalizer.
//!
//! Turns a large, noisy set of subtopic labels into a small set of named
//! topics, and maps arbitrary new labels onto those topics.
//!
//! ## Features
//! - K-means partitioning with k-means++ seeding and fixed-seed restarts
//! - Automatic cluster count via silhouette search
//! - Optional naming assistant with validated replies and frequency fallback
//! - Lexical frequency-banding fallback when embeddings are unavailable
//! - Nearest-key topic mapping with a "General" sentinel
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use quiz_embeddings::HashingEmbedder;
//! use quiz_topics::{TopicClusterer, TopicsConfig};
//!
//! let clusterer = TopicClusterer::new(Arc::new(HashingEmbedder::default()), TopicsConfig::default());
//! let result = clusterer.normalize_with_target(
//!     &["cell biology".to_string(), "genetics".to_string()],
//!     5,
//! );
//! assert_eq!(result.normalized_topics.len(), 2);
//! ```

pub mod clusterer;
pub mod config;
pub mod error;
pub mod fallback;
pub mod kmeans;
pub mod mapper;
pub mod naming;
pub mod silhouette;
pub mod similarity;
pub mod stats;
pub mod text;

pub use clusterer::{candidate_range, clean_subtopics, TopicClusterer};
pub use config::{ClusteringConfig, MappingConfig, NamingConfig, TopicsConfig};
pub use error::TopicsError;
pub use kmeans::{partition, partition_with, KMeansParams, Partition};
pub use mapper::TopicMapper;
pub use naming::{
    frequency_name, NamingAssistant, NamingError, NoOpNamingAssistant, TopicNamer,
    FALLBACK_TOPIC_NAME,
};
pub use silhouette::{silhouette_from_distances, silhouette_score};
pub use similarity::{cosine_similarity, similarity_matrix};
pub use stats::calculate_statistics;
pub use text::{jaccard_similarity, lexical_similarity_matrix, tokenize};
