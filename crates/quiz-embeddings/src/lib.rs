//! # quiz-embeddings
//!
//! Embedding provider interface for the quiz normalizer.
//!
//! The normalizer never owns an embedding model. Callers inject any
//! implementation of [`EmbeddingModel`]; the clusterer, mapper, detector and
//! selector only ever see the trait.
//!
//! ## Features
//! - `EmbeddingModel` trait with single and batch embedding
//! - Chunked batch embedding that preserves input order
//! - `HashingEmbedder`: deterministic, dependency-free lexical embedder for
//!   offline runs and tests

pub mod batch;
pub mod error;
pub mod hashing;
pub mod model;

pub use batch::{embed_in_chunks, EmbeddingConfig, DEFAULT_CHUNK_SIZE};
pub use error::EmbeddingError;
pub use hashing::HashingEmbedder;
pub use model::{Embedding, EmbeddingModel, ModelInfo};
