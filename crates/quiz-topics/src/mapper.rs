//! Mapping arbitrary subtopic labels onto normalized topics.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, OnceLock};

use quiz_embeddings::{embed_in_chunks, EmbeddingModel, DEFAULT_CHUNK_SIZE};
use quiz_types::{NormalizationResult, Question, TopicMapping, GENERAL_TOPIC};
use tracing::{debug, info};

use crate::config::MappingConfig;
use crate::similarity::cosine_similarity;

/// Total function from subtopic labels to topic names.
///
/// Known labels resolve directly (exactly, then case-insensitively). Unknown
/// labels adopt the topic of the most similar known label when the cosine
/// similarity reaches the threshold, and `"General"` otherwise.
pub struct TopicMapper {
    mapping: TopicMapping,
    folded: HashMap<String, String>,
    keys: Vec<String>,
    embedder: Arc<dyn EmbeddingModel>,
    threshold: f32,
    chunk_size: usize,
    /// Key embeddings, computed on first unknown label; `None` if that failed
    key_vectors: OnceLock<Option<Vec<Vec<f32>>>>,
}

impl TopicMapper {
    /// Create a mapper over an existing subtopic → topic mapping.
    pub fn new(mapping: TopicMapping, embedder: Arc<dyn EmbeddingModel>, config: &MappingConfig) -> Self {
        let folded = mapping
            .iter()
            .map(|(key, topic)| (fold(key), topic.clone()))
            .collect();
        let keys = mapping.keys().cloned().collect();
        Self {
            mapping,
            folded,
            keys,
            embedder,
            threshold: config.similarity_threshold,
            chunk_size: DEFAULT_CHUNK_SIZE,
            key_vectors: OnceLock::new(),
        }
    }

    /// Create a mapper from a normalization result.
    pub fn from_result(
        result: &NormalizationResult,
        embedder: Arc<dyn EmbeddingModel>,
        config: &MappingConfig,
    ) -> Self {
        Self::new(result.topic_mapping.clone(), embedder, config)
    }

    /// Set the maximum number of keys per embedding call.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Resolve a subtopic label to a topic name.
    pub fn map(&self, subtopic: &str) -> String {
        if let Some(topic) = self.mapping.get(subtopic) {
            return topic.clone();
        }
        if subtopic.trim().is_empty() {
            return GENERAL_TOPIC.to_string();
        }
        if let Some(topic) = self.folded.get(&fold(subtopic)) {
            return topic.clone();
        }
        self.nearest_topic(subtopic)
            .unwrap_or_else(|| GENERAL_TOPIC.to_string())
    }

    /// Set `normalized_topic` on every question from its subtopic.
    ///
    /// Returns the resulting topic distribution.
    pub fn map_questions(&self, questions: &mut [Question]) -> BTreeMap<String, usize> {
        let mut distribution: BTreeMap<String, usize> = BTreeMap::new();
        for question in questions.iter_mut() {
            let topic = self.map(&question.subtopic);
            *distribution.entry(topic.clone()).or_insert(0) += 1;
            question.normalized_topic = Some(topic);
        }

        info!(
            questions = questions.len(),
            topics = distribution.len(),
            "Mapped questions to normalized topics"
        );
        distribution
    }

    fn nearest_topic(&self, subtopic: &str) -> Option<String> {
        if self.keys.is_empty() {
            return None;
        }

        let key_vectors = self
            .key_vectors
            .get_or_init(|| {
                match embed_in_chunks(self.embedder.as_ref(), &self.keys, self.chunk_size) {
                    Ok(vectors) => Some(vectors),
                    Err(e) => {
                        debug!(error = %e, "Could not embed mapped subtopics");
                        None
                    }
                }
            })
            .as_ref()?;

        let query = match self.embedder.embed(subtopic) {
            Ok(embedding) => embedding.into_vec(),
            Err(e) => {
                debug!(subtopic = %subtopic, error = %e, "Could not embed subtopic");
                return None;
            }
        };

        let mut best: Option<(usize, f32)> = None;
        for (index, vector) in key_vectors.iter().enumerate() {
            let sim = cosine_similarity(&query, vector);
            let better = match best {
                Some((_, best_sim)) => sim > best_sim,
                None => true,
            };
            if better {
                best = Some((index, sim));
            }
        }

        let (index, sim) = best?;
        if sim >= self.threshold {
            debug!(subtopic = %subtopic, nearest = %self.keys[index], similarity = sim, "Mapped by similarity");
            self.mapping.get(&self.keys[index]).cloned()
        } else {
            None
        }
    }
}

fn fold(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_embeddings::{Embedding, EmbeddingError, ModelInfo};
    use quiz_types::QuestionType;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Embeds known words onto fixed axes and counts calls.
    struct AxisEmbedder {
        info: ModelInfo,
        calls: AtomicUsize,
        fail: bool,
    }

    impl AxisEmbedder {
        fn new(fail: bool) -> Self {
            Self {
                info: ModelInfo {
                    name: "axis".to_string(),
                    dimension: 3,
                },
                calls: AtomicUsize::new(0),
                fail,
            }
        }
    }

    impl EmbeddingModel for AxisEmbedder {
        fn info(&self) -> &ModelInfo {
            &self.info
        }

        fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(EmbeddingError::Unavailable("offline".to_string()));
            }
            let lower = text.to_lowercase();
            let v = if lower.contains("neural") {
                vec![1.0, 0.1, 0.0]
            } else if lower.contains("cell") {
                vec![0.0, 1.0, 0.1]
            } else {
                vec![0.0, 0.0, 1.0]
            };
            Ok(Embedding::new(v))
        }
    }

    fn mapping() -> TopicMapping {
        let mut mapping = TopicMapping::new();
        mapping.insert("neural networks".to_string(), "Machine Learning".to_string());
        mapping.insert("cell biology".to_string(), "Biology".to_string());
        mapping
    }

    fn mapper(embedder: Arc<AxisEmbedder>) -> TopicMapper {
        TopicMapper::new(mapping(), embedder, &MappingConfig::default())
    }

    #[test]
    fn test_exact_key() {
        let embedder = Arc::new(AxisEmbedder::new(false));
        let mapper = mapper(embedder.clone());
        assert_eq!(mapper.map("neural networks"), "Machine Learning");
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_case_insensitive_key() {
        let embedder = Arc::new(AxisEmbedder::new(false));
        let mapper = mapper(embedder.clone());
        assert_eq!(mapper.map("Cell  Biology"), "Biology");
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_blank_is_general() {
        let mapper = mapper(Arc::new(AxisEmbedder::new(false)));
        assert_eq!(mapper.map(""), GENERAL_TOPIC);
        assert_eq!(mapper.map("   "), GENERAL_TOPIC);
    }

    #[test]
    fn test_similar_label_adopts_topic() {
        let mapper = mapper(Arc::new(AxisEmbedder::new(false)));
        assert_eq!(mapper.map("neural network architectures"), "Machine Learning");
        assert_eq!(mapper.map("cell membranes"), "Biology");
    }

    #[test]
    fn test_dissimilar_label_is_general() {
        let mapper = mapper(Arc::new(AxisEmbedder::new(false)));
        assert_eq!(mapper.map("medieval history"), GENERAL_TOPIC);
    }

    #[test]
    fn test_key_embeddings_cached() {
        let embedder = Arc::new(AxisEmbedder::new(false));
        let mapper = mapper(embedder.clone());
        mapper.map("neural nets");
        // two keys plus one query
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 3);
        mapper.map("cell walls");
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_embedding_failure_is_general() {
        let mapper = mapper(Arc::new(AxisEmbedder::new(true)));
        assert_eq!(mapper.map("neural nets"), GENERAL_TOPIC);
        assert_eq!(mapper.map("neural networks"), "Machine Learning");
    }

    #[test]
    fn test_empty_mapping_is_general() {
        let mapper = TopicMapper::new(
            TopicMapping::new(),
            Arc::new(AxisEmbedder::new(false)),
            &MappingConfig::default(),
        );
        assert_eq!(mapper.map("neural nets"), GENERAL_TOPIC);
    }

    #[test]
    fn test_map_questions() {
        let mapper = mapper(Arc::new(AxisEmbedder::new(false)));
        let mut questions = vec![
            Question::new("q1", "What is a perceptron?", "a neuron model", QuestionType::ShortAnswer)
                .with_subtopic("neural networks"),
            Question::new("q2", "What is a ribosome?", "", QuestionType::ShortAnswer)
                .with_subtopic("cell organelles"),
            Question::new("q3", "Who won in 1066?", "", QuestionType::ShortAnswer),
        ];

        let distribution = mapper.map_questions(&mut questions);

        assert_eq!(questions[0].normalized_topic.as_deref(), Some("Machine Learning"));
        assert_eq!(questions[1].normalized_topic.as_deref(), Some("Biology"));
        assert_eq!(questions[2].normalized_topic.as_deref(), Some(GENERAL_TOPIC));
        assert_eq!(distribution.len(), 3);
        assert_eq!(distribution.get("Biology"), Some(&1));
    }
}
