//! End-to-end test infrastructure for the quiz normalizer.
//!
//! Provides deterministic collaborator stubs and shared fixtures for E2E
//! tests covering clustering, mapping, deduplication and selection.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use quiz_embeddings::{Embedding, EmbeddingError, EmbeddingModel, ModelInfo};
use quiz_topics::{NamingAssistant, NamingError};
use quiz_types::{Question, QuestionType};

/// Embeds a fixed vocabulary onto hand-placed vectors.
///
/// Texts outside the table are rejected, so a test can tell exactly which
/// labels reached the provider.
pub struct KeyedEmbedder {
    info: ModelInfo,
    table: HashMap<String, Vec<f32>>,
    calls: AtomicUsize,
}

impl KeyedEmbedder {
    /// Create an empty embedder for `dimension`-component vectors.
    pub fn new(dimension: usize) -> Self {
        Self {
            info: ModelInfo {
                name: "keyed".to_string(),
                dimension,
            },
            table: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Register the vector for `text`.
    pub fn with(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.table.insert(text.to_string(), vector);
        self
    }

    /// Number of single-text embed calls served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl EmbeddingModel for KeyedEmbedder {
    fn info(&self) -> &ModelInfo {
        &self.info
    }

    fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.table
            .get(text)
            .map(|v| Embedding::new(v.clone()))
            .ok_or_else(|| EmbeddingError::InvalidInput(format!("unknown text: {text}")))
    }
}

/// Provider that is always unavailable.
pub struct FailingEmbedder {
    info: ModelInfo,
    calls: AtomicUsize,
}

impl FailingEmbedder {
    pub fn new() -> Self {
        Self {
            info: ModelInfo {
                name: "failing".to_string(),
                dimension: 8,
            },
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for FailingEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl EmbeddingModel for FailingEmbedder {
    fn info(&self) -> &ModelInfo {
        &self.info
    }

    fn embed(&self, _text: &str) -> Result<Embedding, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(EmbeddingError::Unavailable("provider offline".to_string()))
    }
}

/// Naming assistant with canned replies keyed by a member substring.
///
/// The first `(needle, reply)` whose needle occurs in any member label wins.
/// Clusters matching no needle get a `Rejected` error.
pub struct CannedNamer {
    replies: Vec<(String, String)>,
    calls: AtomicUsize,
}

impl CannedNamer {
    pub fn new(replies: &[(&str, &str)]) -> Self {
        Self {
            replies: replies
                .iter()
                .map(|(needle, reply)| (needle.to_string(), reply.to_string()))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl NamingAssistant for CannedNamer {
    fn suggest_name(&self, members: &[String], _hint: &str) -> Result<String, NamingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.replies
            .iter()
            .find(|(needle, _)| members.iter().any(|m| m.contains(needle.as_str())))
            .map(|(_, reply)| reply.clone())
            .ok_or_else(|| NamingError::Rejected("no canned reply".to_string()))
    }
}

/// Owned labels from string literals.
pub fn labels(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Two machine-learning themes and two biology themes, plus a synonym.
pub fn scenario_subtopics() -> Vec<String> {
    labels(&[
        "neural networks",
        "deep learning",
        "photosynthesis",
        "cell biology",
        "neural nets",
    ])
}

/// Embedder placing the scenario subtopics in two tight groups.
///
/// Also knows a few labels that are not scenario subtopics, for mapping
/// tests.
pub fn ml_bio_embedder() -> KeyedEmbedder {
    KeyedEmbedder::new(3)
        .with("neural networks", vec![1.0, 0.05, 0.0])
        .with("deep learning", vec![0.95, 0.1, 0.0])
        .with("neural nets", vec![1.0, 0.0, 0.05])
        .with("photosynthesis", vec![0.0, 0.1, 1.0])
        .with("cell biology", vec![0.05, 0.0, 0.95])
        .with("neural network models", vec![0.98, 0.05, 0.02])
        .with("medieval poetry", vec![0.0, 1.0, 0.0])
}

/// Short-answer question with a subtopic.
pub fn question(id: &str, text: &str, answer: &str, subtopic: &str) -> Question {
    Question::new(id, text, answer, QuestionType::ShortAnswer).with_subtopic(subtopic)
}

/// Unit vector along `axis`.
pub fn one_hot(axis: usize, dimension: usize) -> Vec<f32> {
    let mut v = vec![0.0; dimension];
    v[axis] = 1.0;
    v
}

/// Ids of `questions`, in order.
pub fn ids(questions: &[Question]) -> Vec<&str> {
    questions.iter().map(|q| q.question_id.as_str()).collect()
}
