//! # quiz-dedup
//!
//! Question deduplication and diversity selection for the quiz normalizer.
//!
//! ## Features
//! - Embedding similarity with a word-overlap fallback
//! - Secondary same-concept test (question type, answers, topic, keywords)
//! - Duplicate groups with the earliest question as representative
//! - Near-duplicate analysis and a summary report
//! - Greedy quality-first diversity selection, per group or per topic
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use quiz_dedup::{DedupConfig, DuplicateDetector};
//! use quiz_embeddings::HashingEmbedder;
//! use quiz_types::{Question, QuestionType};
//!
//! let detector = DuplicateDetector::new(Arc::new(HashingEmbedder::default()), DedupConfig::default());
//! let q = |id: &str| Question::new(id, "What is osmosis?", "", QuestionType::ShortAnswer);
//! let result = detector.detect(vec![q("q1"), q("q2")]);
//! assert_eq!(result.unique_ids(), vec!["q1"]);
//! ```

pub mod concept;
pub mod config;
pub mod detector;
pub mod diversity;
pub mod error;
pub mod matrix;
pub mod near;
pub mod report;
pub mod scoring;
pub mod stats;

pub use concept::{is_duplicate, same_concept, significant_keywords};
pub use config::{ConceptConfig, DedupConfig, DiversityConfig};
pub use detector::DuplicateDetector;
pub use diversity::DiversitySelector;
pub use error::DedupError;
pub use matrix::SimilarityMatrix;
pub use near::{NearDuplicate, NearDuplicateReason};
pub use report::{DeduplicationReport, Impact, ImpactAnalysis, ReportSummary};
pub use scoring::{quality_score, DEFAULT_COMPONENT_SCORE};
pub use stats::calculate_statistics;
