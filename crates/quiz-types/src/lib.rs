//! # quiz-types
//!
//! Shared domain types for the quiz normalizer.
//!
//! This crate defines the records exchanged between the normalizer
//! components and handed to the persistence collaborator:
//! - Questions: generated quiz questions, parsed strictly at the boundary
//! - Normalized topics: clusters of subtopics with a name and cohesion score
//! - Duplicate groups: questions suppressed in favour of a representative
//! - Result records and their statistics
//!
//! ## Usage
//!
//! ```rust
//! use quiz_types::{Question, QuestionType};
//!
//! let q = Question::from_json(
//!     r#"{"id": "q1", "text": "What is DNA?", "type": "short_answer"}"#,
//! ).unwrap();
//! assert_eq!(q.question_type, QuestionType::ShortAnswer);
//! ```

pub mod dedup;
pub mod error;
pub mod question;
pub mod topic;

pub use dedup::{DeduplicationResult, DeduplicationStatistics, DuplicateGroup, SimilarityMethod};
pub use error::ParseError;
pub use question::{Question, QuestionType, GENERAL_TOPIC};
pub use topic::{
    NormalizationMethod, NormalizationQuality, NormalizationResult, NormalizationStatistics,
    NormalizedTopic, TopicMapping,
};
