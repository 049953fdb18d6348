//! Deterministic feature-hashing embedder.
//!
//! Projects word unigrams and character trigrams into a fixed number of
//! signed buckets using FNV-1a. Texts sharing words or word stems land close
//! together, unrelated texts land near-orthogonal. Output is stable across
//! processes and platforms, which makes it suitable as an offline provider
//! and as a baseline in tests.

use crate::error::EmbeddingError;
use crate::model::{Embedding, EmbeddingModel, ModelInfo};

/// Default embedding dimension.
pub const DEFAULT_DIMENSION: usize = 256;

/// Weight of a whole-word feature.
const WORD_WEIGHT: f32 = 1.0;

/// Weight of a character trigram feature.
const TRIGRAM_WEIGHT: f32 = 0.5;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Words that carry no topical signal.
const FILLER_WORDS: &[&str] = &[
    "a", "an", "and", "are", "is", "of", "the", "to", "in", "on", "for", "with", "what", "which",
    "how", "why", "does", "do", "by", "as", "at", "it", "that", "this",
];

/// Feature-hashing embedder with a fixed dimension.
pub struct HashingEmbedder {
    info: ModelInfo,
}

impl HashingEmbedder {
    /// Create an embedder producing vectors of `dimension` components.
    pub fn new(dimension: usize) -> Result<Self, EmbeddingError> {
        if dimension == 0 {
            return Err(EmbeddingError::InvalidInput(
                "dimension must be > 0".to_string(),
            ));
        }
        Ok(Self {
            info: ModelInfo {
                name: format!("hashing-{}", dimension),
                dimension,
            },
        })
    }

    fn accumulate(&self, feature: &str, weight: f32, values: &mut [f32]) {
        let hash = fnv1a(feature.as_bytes());
        let bucket = (hash % self.info.dimension as u64) as usize;
        let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
        values[bucket] += sign * weight;
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self {
            info: ModelInfo {
                name: format!("hashing-{}", DEFAULT_DIMENSION),
                dimension: DEFAULT_DIMENSION,
            },
        }
    }
}

impl EmbeddingModel for HashingEmbedder {
    fn info(&self) -> &ModelInfo {
        &self.info
    }

    fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        let mut values = vec![0.0f32; self.info.dimension];
        let lowered = text.to_lowercase();

        let words = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.chars().count() > 1)
            .filter(|w| !FILLER_WORDS.contains(w));

        for word in words {
            self.accumulate(word, WORD_WEIGHT, &mut values);

            let padded: Vec<char> = format!("#{}#", word).chars().collect();
            for window in padded.windows(3) {
                let trigram: String = window.iter().collect();
                self.accumulate(&trigram, TRIGRAM_WEIGHT, &mut values);
            }
        }

        Ok(Embedding::new(values))
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, &b| {
        (hash ^ b as u64).wrapping_mul(FNV_PRIME)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cosine(a: &Embedding, b: &Embedding) -> f32 {
        a.values.iter().zip(b.values.iter()).map(|(x, y)| x * y).sum()
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(HashingEmbedder::new(0).is_err());
    }

    #[test]
    fn test_dimension_fixed() {
        let embedder = HashingEmbedder::new(64).unwrap();
        let emb = embedder.embed("photosynthesis in plants").unwrap();
        assert_eq!(emb.dimension(), 64);
        assert_eq!(embedder.info().dimension, 64);
        assert_eq!(embedder.info().name, "hashing-64");
    }

    #[test]
    fn test_deterministic() {
        let embedder = HashingEmbedder::default();
        let a = embedder.embed("Cell biology basics").unwrap();
        let b = embedder.embed("Cell biology basics").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_identical_text_similarity_one() {
        let embedder = HashingEmbedder::default();
        let a = embedder.embed("What is photosynthesis?").unwrap();
        let b = embedder.embed("what is PHOTOSYNTHESIS").unwrap();
        assert!((cosine(&a, &b) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_shared_words_more_similar() {
        let embedder = HashingEmbedder::default();
        let nets = embedder.embed("neural networks").unwrap();
        let nets_short = embedder.embed("neural nets").unwrap();
        let plants = embedder.embed("photosynthesis").unwrap();
        assert!(cosine(&nets, &nets_short) > cosine(&nets, &plants));
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let embedder = HashingEmbedder::default();
        let emb = embedder.embed("").unwrap();
        assert!(emb.values.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_fnv1a_known_value() {
        // FNV-1a of the empty input is the offset basis
        assert_eq!(fnv1a(b""), FNV_OFFSET);
        assert_ne!(fnv1a(b"a"), fnv1a(b"b"));
    }
}
