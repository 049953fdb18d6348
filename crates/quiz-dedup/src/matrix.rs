//! Pairwise question similarity.
//!
//! Questions that already carry embeddings of one shared dimension are
//! compared directly. Otherwise question texts are embedded through the
//! provider. If the provider fails, similarity falls back to word-overlap
//! Jaccard over the question texts and the matrix is flagged accordingly.

use quiz_embeddings::{embed_in_chunks, EmbeddingModel};
use quiz_topics::{lexical_similarity_matrix, similarity_matrix};
use quiz_types::{Question, SimilarityMethod};
use tracing::{debug, warn};

use crate::error::DedupError;

/// Symmetric similarity matrix with the method that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    values: Vec<Vec<f32>>,
    method: SimilarityMethod,
}

impl SimilarityMatrix {
    /// Wrap precomputed values.
    pub fn from_values(values: Vec<Vec<f32>>, method: SimilarityMethod) -> Self {
        Self { values, method }
    }

    /// Build the matrix for `questions`.
    pub fn build(
        questions: &[Question],
        embedder: &dyn EmbeddingModel,
        chunk_size: usize,
    ) -> Self {
        match question_vectors(questions, embedder, chunk_size) {
            Ok(vectors) => Self {
                values: similarity_matrix(&vectors),
                method: SimilarityMethod::Embedding,
            },
            Err(e) => {
                warn!(
                    questions = questions.len(),
                    error = %e,
                    "Question embedding failed, using lexical similarity"
                );
                let texts: Vec<String> = questions.iter().map(|q| q.question_text.clone()).collect();
                Self {
                    values: lexical_similarity_matrix(&texts),
                    method: SimilarityMethod::Fallback,
                }
            }
        }
    }

    /// Similarity between items `i` and `j`; 0.0 when out of range.
    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.values
            .get(i)
            .and_then(|row| row.get(j))
            .copied()
            .unwrap_or(0.0)
    }

    /// Which signal produced the values.
    pub fn method(&self) -> SimilarityMethod {
        self.method
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the matrix is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Embeddings carried by the questions themselves, if every question has
/// one and they all share a non-zero dimension.
pub fn own_embeddings(questions: &[Question]) -> Option<Vec<Vec<f32>>> {
    let mut dimension: Option<usize> = None;
    let mut vectors = Vec::with_capacity(questions.len());

    for question in questions {
        let embedding = question.embedding.as_ref()?;
        if embedding.is_empty() {
            return None;
        }
        match dimension {
            None => dimension = Some(embedding.len()),
            Some(dim) if dim != embedding.len() => return None,
            Some(_) => {}
        }
        vectors.push(embedding.clone());
    }

    Some(vectors)
}

fn question_vectors(
    questions: &[Question],
    embedder: &dyn EmbeddingModel,
    chunk_size: usize,
) -> Result<Vec<Vec<f32>>, DedupError> {
    if let Some(vectors) = own_embeddings(questions) {
        debug!(questions = questions.len(), "Using question embeddings");
        return Ok(vectors);
    }

    let texts: Vec<String> = questions.iter().map(|q| q.question_text.clone()).collect();
    Ok(embed_in_chunks(embedder, &texts, chunk_size)?)
}
