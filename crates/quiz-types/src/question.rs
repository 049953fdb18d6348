//! Quiz question record.
//!
//! Generation collaborators return loosely keyed JSON. Every record is
//! parsed exactly once here, through an explicit alias table, into a typed
//! [`Question`]. Unknown keys are rejected rather than carried downstream.

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Sentinel topic for questions that map to no normalized topic.
pub const GENERAL_TOPIC: &str = "General";

/// Question format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    /// Multiple choice
    #[serde(alias = "multiple_choice")]
    Mcq,
    /// Free-text short answer
    #[serde(alias = "short")]
    ShortAnswer,
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuestionType::Mcq => write!(f, "mcq"),
            QuestionType::ShortAnswer => write!(f, "short_answer"),
        }
    }
}

/// A generated quiz question.
///
/// Accepted key aliases:
///
/// | canonical          | aliases              |
/// |--------------------|----------------------|
/// | `question_id`      | `id`                 |
/// | `question_text`    | `text`, `question`   |
/// | `answer`           | `correct_answer`     |
/// | `question_type`    | `type`               |
/// | `normalized_topic` | `topic`              |
/// | `validation_score` | `validation`         |
/// | `confidence_score` | `confidence`         |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Question {
    /// Unique question identifier
    #[serde(alias = "id")]
    pub question_id: String,

    /// Question text shown to the student
    #[serde(alias = "text", alias = "question")]
    pub question_text: String,

    /// Expected answer (may be empty)
    #[serde(default, alias = "correct_answer")]
    pub answer: String,

    /// Question format
    #[serde(alias = "type")]
    pub question_type: QuestionType,

    /// Raw subtopic the question was generated from
    #[serde(default)]
    pub subtopic: String,

    /// Normalized topic, assigned by the topic mapper
    #[serde(default, alias = "topic", skip_serializing_if = "Option::is_none")]
    pub normalized_topic: Option<String>,

    /// Precomputed text embedding, if the caller already has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,

    /// Validation score from the validation collaborator (0.0 - 1.0)
    #[serde(default, alias = "validation", skip_serializing_if = "Option::is_none")]
    pub validation_score: Option<f32>,

    /// Generator confidence (0.0 - 1.0)
    #[serde(default, alias = "confidence", skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f32>,

    /// Difficulty label (easy / medium / hard)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,

    /// Answer options for multiple choice questions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,

    /// Answer explanation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,

    /// Number of suppressed duplicates this question represents
    #[serde(default)]
    pub duplicate_count: usize,
}

impl Question {
    /// Create a question with the required fields.
    pub fn new(
        question_id: impl Into<String>,
        question_text: impl Into<String>,
        answer: impl Into<String>,
        question_type: QuestionType,
    ) -> Self {
        Self {
            question_id: question_id.into(),
            question_text: question_text.into(),
            answer: answer.into(),
            question_type,
            subtopic: String::new(),
            normalized_topic: None,
            embedding: None,
            validation_score: None,
            confidence_score: None,
            difficulty: None,
            options: Vec::new(),
            explanation: None,
            duplicate_count: 0,
        }
    }

    /// Set the raw subtopic.
    pub fn with_subtopic(mut self, subtopic: impl Into<String>) -> Self {
        self.subtopic = subtopic.into();
        self
    }

    /// Set the normalized topic.
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.normalized_topic = Some(topic.into());
        self
    }

    /// Attach a precomputed embedding.
    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    /// Set validation and confidence scores.
    pub fn with_scores(mut self, validation: f32, confidence: f32) -> Self {
        self.validation_score = Some(validation);
        self.confidence_score = Some(confidence);
        self
    }

    /// Parse a question from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ParseError> {
        let question: Question = serde_json::from_str(json)?;
        question.validated()
    }

    /// Parse a question from an already-decoded JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ParseError> {
        let question: Question = serde_json::from_value(value)?;
        question.validated()
    }

    /// Normalized topic, or the "General" sentinel when unassigned.
    pub fn topic_or_general(&self) -> &str {
        match self.normalized_topic.as_deref() {
            Some(topic) if !topic.is_empty() => topic,
            _ => GENERAL_TOPIC,
        }
    }

    /// Number of whitespace separated words in the question text.
    pub fn word_count(&self) -> usize {
        self.question_text.split_whitespace().count()
    }

    fn validated(self) -> Result<Self, ParseError> {
        if self.question_id.trim().is_empty() {
            return Err(ParseError::InvalidField {
                field: "question_id",
                reason: "must not be blank".to_string(),
            });
        }
        for (field, score) in [
            ("validation_score", self.validation_score),
            ("confidence_score", self.confidence_score),
        ] {
            if let Some(s) = score {
                if !s.is_finite() {
                    return Err(ParseError::InvalidField {
                        field,
                        reason: format!("must be a finite number, got {}", s),
                    });
                }
            }
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_keys() {
        let q = Question::from_json(
            r#"{
                "question_id": "q1",
                "question_text": "What is machine learning?",
                "answer": "A subset of AI",
                "question_type": "short_answer",
                "subtopic": "basics",
                "validation_score": 0.8,
                "confidence_score": 0.7
            }"#,
        )
        .unwrap();

        assert_eq!(q.question_id, "q1");
        assert_eq!(q.question_type, QuestionType::ShortAnswer);
        assert_eq!(q.subtopic, "basics");
        assert_eq!(q.validation_score, Some(0.8));
        assert_eq!(q.duplicate_count, 0);
    }

    #[test]
    fn test_parse_aliases() {
        let q = Question::from_json(
            r#"{
                "id": "q2",
                "question": "Which organelle performs photosynthesis?",
                "correct_answer": "Chloroplast",
                "type": "multiple_choice",
                "topic": "Cell Biology",
                "confidence": 0.9,
                "options": ["Chloroplast", "Nucleus"]
            }"#,
        )
        .unwrap();

        assert_eq!(q.question_id, "q2");
        assert_eq!(q.answer, "Chloroplast");
        assert_eq!(q.question_type, QuestionType::Mcq);
        assert_eq!(q.normalized_topic.as_deref(), Some("Cell Biology"));
        assert_eq!(q.confidence_score, Some(0.9));
        assert_eq!(q.options.len(), 2);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = Question::from_json(
            r#"{"id": "q1", "text": "t", "type": "mcq", "qustion_text": "typo"}"#,
        );
        assert!(matches!(result, Err(ParseError::Schema(_))));
    }

    #[test]
    fn test_missing_type_rejected() {
        let result = Question::from_json(r#"{"id": "q1", "text": "t"}"#);
        assert!(matches!(result, Err(ParseError::Schema(_))));
    }

    #[test]
    fn test_unknown_type_rejected() {
        let result = Question::from_json(r#"{"id": "q1", "text": "t", "type": "essay"}"#);
        assert!(matches!(result, Err(ParseError::Schema(_))));
    }

    #[test]
    fn test_blank_id_rejected() {
        let result = Question::from_json(r#"{"id": "  ", "text": "t", "type": "mcq"}"#);
        assert!(matches!(
            result,
            Err(ParseError::InvalidField {
                field: "question_id",
                ..
            })
        ));
    }

    #[test]
    fn test_malformed_json() {
        let result = Question::from_json(r#"{"id": "q1", "#);
        assert!(matches!(result, Err(ParseError::Syntax(_))));
    }

    #[test]
    fn test_from_value() {
        let value = serde_json::json!({
            "id": "q3",
            "text": "Define osmosis",
            "type": "short"
        });
        let q = Question::from_value(value).unwrap();
        assert_eq!(q.question_type, QuestionType::ShortAnswer);
        assert!(q.answer.is_empty());
    }

    #[test]
    fn test_serialize_uses_canonical_keys() {
        let q = Question::new("q1", "What is DNA?", "A molecule", QuestionType::Mcq)
            .with_topic("Genetics");
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["question_id"], "q1");
        assert_eq!(json["question_type"], "mcq");
        assert_eq!(json["normalized_topic"], "Genetics");
        assert!(json.get("embedding").is_none());

        // Serialized form parses back
        let parsed = Question::from_value(json).unwrap();
        assert_eq!(parsed, q);
    }

    #[test]
    fn test_topic_or_general() {
        let q = Question::new("q1", "t", "", QuestionType::Mcq);
        assert_eq!(q.topic_or_general(), GENERAL_TOPIC);
        let q = q.with_topic("");
        assert_eq!(q.topic_or_general(), GENERAL_TOPIC);
        let q = q.with_topic("Genetics");
        assert_eq!(q.topic_or_general(), "Genetics");
    }

    #[test]
    fn test_word_count() {
        let q = Question::new("q1", "  What   is a cell? ", "", QuestionType::ShortAnswer);
        assert_eq!(q.word_count(), 4);
    }

    #[test]
    fn test_question_type_display() {
        assert_eq!(QuestionType::Mcq.to_string(), "mcq");
        assert_eq!(QuestionType::ShortAnswer.to_string(), "short_answer");
    }
}
