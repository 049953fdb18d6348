//! Chunked batch embedding.
//!
//! Large batches are split into bounded chunks before being sent to the
//! provider. Results are concatenated in input order, so chunk boundaries
//! never influence downstream similarity matrices. A single failed chunk
//! fails the whole batch.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::EmbeddingError;
use crate::model::EmbeddingModel;

/// Default maximum number of texts per provider call.
pub const DEFAULT_CHUNK_SIZE: usize = 100;

/// Embedding call configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Maximum texts sent to the provider in one batch call
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
        }
    }
}

impl EmbeddingConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("chunk_size must be > 0".to_string());
        }
        Ok(())
    }
}

/// Embed `texts` in chunks of at most `chunk_size` items.
///
/// Returns one vector per input text, in input order. Fails if the provider
/// returns the wrong number of vectors for a chunk or if vector dimensions
/// disagree across chunks.
pub fn embed_in_chunks(
    model: &dyn EmbeddingModel,
    texts: &[String],
    chunk_size: usize,
) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    if chunk_size == 0 {
        return Err(EmbeddingError::InvalidInput(
            "chunk_size must be > 0".to_string(),
        ));
    }

    let mut vectors: Vec<Vec<f32>> = Vec::with_capacity(texts.len());
    let mut dimension: Option<usize> = None;

    for (chunk_index, chunk) in texts.chunks(chunk_size).enumerate() {
        let embeddings = model.embed_texts(chunk)?;

        if embeddings.len() != chunk.len() {
            return Err(EmbeddingError::BatchLengthMismatch {
                sent: chunk.len(),
                received: embeddings.len(),
            });
        }

        for embedding in embeddings {
            let dim = embedding.dimension();
            match dimension {
                None => dimension = Some(dim),
                Some(expected) if expected != dim => {
                    return Err(EmbeddingError::DimensionMismatch {
                        expected,
                        actual: dim,
                    });
                }
                Some(_) => {}
            }
            vectors.push(embedding.into_vec());
        }

        debug!(chunk = chunk_index, size = chunk.len(), "Embedded chunk");
    }

    Ok(vectors)
}
