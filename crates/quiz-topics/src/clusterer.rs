//! Topic clustering.
//!
//! Collapses a noisy list of subtopic labels into a small set of named
//! topics:
//!
//! 1. Labels are cleaned and deduplicated case-insensitively.
//! 2. Inputs no larger than the target count become one topic each.
//! 3. Otherwise labels are embedded, k-means is run over a range of cluster
//!    counts and the count with the best silhouette coefficient wins.
//! 4. Each cluster gets a representative (member nearest the mean vector),
//!    a name and a cohesion score.
//!
//! Any embedding or clustering failure degrades the whole pass to lexical
//! frequency banding. Normalization never returns an error.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use quiz_embeddings::{embed_in_chunks, EmbeddingModel, DEFAULT_CHUNK_SIZE};
use quiz_types::{NormalizationMethod, NormalizationResult, NormalizedTopic, TopicMapping};
use tracing::{debug, info, warn};

use crate::config::TopicsConfig;
use crate::error::TopicsError;
use crate::fallback::{lexical_bands, lexical_cohesion};
use crate::kmeans::{partition_with, KMeansParams};
use crate::naming::{frequency_name, NamingAssistant, TopicNamer};
use crate::silhouette::silhouette_from_distances;
use crate::similarity::{mean_pairwise_similarity, mean_vector, pairwise_distances, squared_euclidean};
use crate::stats::calculate_statistics;

/// Silhouette scores closer than this are treated as equal.
const SILHOUETTE_TIE_EPSILON: f64 = 1e-9;

/// A topic before ids are assigned and names made unique.
struct TopicDraft {
    members: Vec<String>,
    representative: String,
    name: String,
    cohesion: f32,
}

/// Clean and deduplicate raw subtopic labels.
///
/// Trims, collapses internal whitespace and keeps labels whose length (in
/// characters) lies within `[min_len, max_len]`. The first spelling of a
/// case-insensitive duplicate wins; input order is preserved.
pub fn clean_subtopics(subtopics: &[String], min_len: usize, max_len: usize) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut cleaned = Vec::new();

    for subtopic in subtopics {
        let label = subtopic.split_whitespace().collect::<Vec<_>>().join(" ");
        let len = label.chars().count();
        if label.is_empty() || len < min_len || len > max_len {
            continue;
        }
        if seen.insert(label.to_lowercase()) {
            cleaned.push(label);
        }
    }

    cleaned
}

/// Inclusive range of cluster counts searched for `n` labels.
///
/// The lower bound is `min(3, target)` (at least 1); the upper bound is
/// `min(2 * target, n - 1)`, never below the lower bound.
pub fn candidate_range(n: usize, target_count: usize) -> (usize, usize) {
    let k_min = target_count.min(3).max(1);
    let k_max = (target_count * 2).min(n.saturating_sub(1)).max(k_min);
    (k_min, k_max)
}

/// Normalizes subtopic labels into named topics.
pub struct TopicClusterer {
    embedder: Arc<dyn EmbeddingModel>,
    namer: TopicNamer,
    config: TopicsConfig,
    chunk_size: usize,
}

impl TopicClusterer {
    /// Create a clusterer that names topics by word frequency.
    pub fn new(embedder: Arc<dyn EmbeddingModel>, config: TopicsConfig) -> Self {
        let namer = TopicNamer::without_assistant(config.naming.clone());
        Self {
            embedder,
            namer,
            config,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Use a naming assistant for cluster names.
    pub fn with_naming_assistant(mut self, assistant: Arc<dyn NamingAssistant>) -> Self {
        self.namer = TopicNamer::new(Some(assistant), self.config.naming.clone());
        self
    }

    /// Set the maximum number of texts per embedding call.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Get the configuration.
    pub fn config(&self) -> &TopicsConfig {
        &self.config
    }

    /// Normalize with the configured target count.
    pub fn normalize(&self, subtopics: &[String]) -> NormalizationResult {
        self.normalize_with_target(subtopics, self.config.clustering.target_count)
    }

    /// Normalize `subtopics` into roughly `target_count` topics.
    pub fn normalize_with_target(
        &self,
        subtopics: &[String],
        target_count: usize,
    ) -> NormalizationResult {
        let target = target_count.max(1);
        let cleaned = clean_subtopics(
            subtopics,
            self.config.clustering.min_subtopic_length,
            self.config.clustering.max_subtopic_length,
        );

        if cleaned.is_empty() {
            info!(raw = subtopics.len(), "No usable subtopics to normalize");
            return finish(Vec::new(), cleaned, NormalizationMethod::Empty);
        }

        if cleaned.len() <= target {
            let drafts = cleaned
                .iter()
                .map(|subtopic| TopicDraft {
                    members: vec![subtopic.clone()],
                    representative: subtopic.clone(),
                    name: subtopic.clone(),
                    cohesion: 1.0,
                })
                .collect();
            let result = finish(drafts, cleaned, NormalizationMethod::OneToOne);
            info!(
                subtopics = result.original_subtopics.len(),
                target, "Few subtopics, using one topic per subtopic"
            );
            return result;
        }

        let (drafts, method) = match self.cluster(&cleaned, target) {
            Ok(drafts) => (drafts, NormalizationMethod::EmbeddingClustering),
            Err(e) => {
                warn!(error = %e, "Embedding clustering failed, using lexical fallback");
                (
                    self.lexical_fallback(&cleaned, target),
                    NormalizationMethod::LexicalFallback,
                )
            }
        };

        let result = finish(drafts, cleaned, method);
        info!(
            subtopics = result.statistics.total_original_subtopics,
            topics = result.statistics.total_normalized_topics,
            method = ?result.method,
            quality = ?result.statistics.normalization_quality,
            "Topic normalization complete"
        );
        result
    }

    fn cluster(&self, cleaned: &[String], target: usize) -> Result<Vec<TopicDraft>, TopicsError> {
        let vectors = embed_in_chunks(self.embedder.as_ref(), cleaned, self.chunk_size)?;

        if vectors.first().is_some_and(|v| v.is_empty()) {
            return Err(TopicsError::Clustering(
                "embeddings have zero dimension".to_string(),
            ));
        }
        if vectors.iter().flatten().any(|x| !x.is_finite()) {
            return Err(TopicsError::Clustering(
                "embeddings contain non-finite values".to_string(),
            ));
        }

        let params = KMeansParams {
            n_init: self.config.clustering.n_init,
            max_iterations: self.config.clustering.max_iterations,
        };
        let seed = self.config.clustering.seed;
        let distances = pairwise_distances(&vectors);
        let (k_min, k_max) = candidate_range(cleaned.len(), target);

        // (k, silhouette, labels)
        let mut best: Option<(usize, f64, Vec<usize>)> = None;
        for k in k_min..=k_max {
            let labels = partition_with(&vectors, k, seed, &params).labels;
            let score = if k <= 1 {
                0.0
            } else {
                silhouette_from_distances(&distances, &labels)
            };
            debug!(k, silhouette = score, "Scored cluster count");

            let better = match &best {
                None => true,
                Some((best_k, best_score, _)) => {
                    if score > best_score + SILHOUETTE_TIE_EPSILON {
                        true
                    } else if (score - best_score).abs() <= SILHOUETTE_TIE_EPSILON {
                        k.abs_diff(target) < best_k.abs_diff(target)
                    } else {
                        false
                    }
                }
            };
            if better {
                best = Some((k, score, labels));
            }
        }

        let (k, score, labels) = best.ok_or_else(|| {
            TopicsError::Clustering(format!("no candidate cluster counts in {k_min}..={k_max}"))
        })?;
        info!(
            subtopics = cleaned.len(),
            k,
            silhouette = score,
            "Selected cluster count"
        );

        let mut groups: Vec<Vec<usize>> = Vec::new();
        for (index, &label) in labels.iter().enumerate() {
            if label >= groups.len() {
                groups.resize_with(label + 1, Vec::new);
            }
            groups[label].push(index);
        }

        let drafts = groups
            .into_iter()
            .filter(|group| !group.is_empty())
            .map(|group| {
                let members: Vec<String> = group.iter().map(|&i| cleaned[i].clone()).collect();
                let member_vectors: Vec<&[f32]> =
                    group.iter().map(|&i| vectors[i].as_slice()).collect();

                let representative = representative_of(&members, &member_vectors);
                let cohesion = mean_pairwise_similarity(&member_vectors);
                let name = self.namer.name_cluster(&members, &representative);

                TopicDraft {
                    members,
                    representative,
                    name,
                    cohesion,
                }
            })
            .collect();

        Ok(drafts)
    }

    fn lexical_fallback(&self, cleaned: &[String], target: usize) -> Vec<TopicDraft> {
        lexical_bands(cleaned, target)
            .into_iter()
            .map(|band| {
                let members: Vec<String> = band.iter().map(|&i| cleaned[i].clone()).collect();
                let representative = members[0].clone();
                let name = frequency_name(&members, self.config.naming.fallback_words);
                let cohesion = lexical_cohesion(&members);
                TopicDraft {
                    members,
                    representative,
                    name,
                    cohesion,
                }
            })
            .collect()
    }
}

/// Member whose vector is nearest the group mean; earliest wins ties.
fn representative_of(members: &[String], vectors: &[&[f32]]) -> String {
    let mean = mean_vector(vectors);
    let mut best = 0;
    let mut best_dist = f32::INFINITY;
    for (index, vector) in vectors.iter().enumerate() {
        let dist = squared_euclidean(vector, &mean);
        if dist < best_dist {
            best = index;
            best_dist = dist;
        }
    }
    members[best].clone()
}

/// Order drafts by size, assign ids, make names unique and build the result.
fn finish(
    mut drafts: Vec<TopicDraft>,
    original: Vec<String>,
    method: NormalizationMethod,
) -> NormalizationResult {
    drafts.sort_by(|a, b| b.members.len().cmp(&a.members.len()));

    let mut used: HashMap<String, usize> = HashMap::new();
    let mut topics = Vec::with_capacity(drafts.len());
    let mut mapping = TopicMapping::new();

    for (index, draft) in drafts.into_iter().enumerate() {
        let name = unique_name(&draft.name, &mut used);
        for member in &draft.members {
            mapping.insert(member.clone(), name.clone());
        }
        topics.push(NormalizedTopic::new(
            NormalizedTopic::id_for_index(index),
            name,
            draft.members,
            draft.representative,
            draft.cohesion,
        ));
    }

    let statistics = calculate_statistics(&topics, &original, method);

    NormalizationResult {
        normalized_topics: topics,
        topic_mapping: mapping,
        original_subtopics: original,
        statistics,
        method,
    }
}

/// Suffix a colliding name with the next free number ("Genetics 2").
fn unique_name(name: &str, used: &mut HashMap<String, usize>) -> String {
    let key = name.to_lowercase();
    if !used.contains_key(&key) {
        used.insert(key, 1);
        return name.to_string();
    }

    let mut suffix = used.get(&key).copied().unwrap_or(1) + 1;
    loop {
        let candidate = format!("{name} {suffix}");
        let candidate_key = candidate.to_lowercase();
        if !used.contains_key(&candidate_key) {
            used.insert(key, suffix);
            used.insert(candidate_key, 1);
            return candidate;
        }
        suffix += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_embeddings::{Embedding, EmbeddingError, HashingEmbedder, ModelInfo};
    use quiz_types::NormalizationQuality;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::naming::NamingError;

    /// Embeds a fixed vocabulary onto hand-placed vectors.
    struct TableEmbedder {
        info: ModelInfo,
        table: Vec<(&'static str, Vec<f32>)>,
    }

    impl TableEmbedder {
        fn new(table: Vec<(&'static str, Vec<f32>)>) -> Self {
            Self {
                info: ModelInfo {
                    name: "table".to_string(),
                    dimension: 3,
                },
                table,
            }
        }
    }

    impl EmbeddingModel for TableEmbedder {
        fn info(&self) -> &ModelInfo {
            &self.info
        }

        fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
            self.table
                .iter()
                .find(|(key, _)| *key == text)
                .map(|(_, v)| Embedding::new(v.clone()))
                .ok_or_else(|| EmbeddingError::InvalidInput(text.to_string()))
        }
    }

    struct FailingEmbedder {
        info: ModelInfo,
    }

    impl EmbeddingModel for FailingEmbedder {
        fn info(&self) -> &ModelInfo {
            &self.info
        }

        fn embed(&self, _text: &str) -> Result<Embedding, EmbeddingError> {
            Err(EmbeddingError::Unavailable("offline".to_string()))
        }
    }

    struct CountingNamer {
        calls: AtomicUsize,
    }

    impl NamingAssistant for CountingNamer {
        fn suggest_name(&self, _members: &[String], hint: &str) -> Result<String, NamingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if hint.contains("neural") || hint.contains("deep") {
                Ok("Machine Learning".to_string())
            } else {
                Ok("Biology".to_string())
            }
        }
    }

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn ml_bio_embedder() -> Arc<TableEmbedder> {
        Arc::new(TableEmbedder::new(vec![
            ("neural networks", vec![1.0, 0.05, 0.0]),
            ("deep learning", vec![0.95, 0.1, 0.0]),
            ("neural nets", vec![1.0, 0.0, 0.05]),
            ("photosynthesis", vec![0.0, 0.1, 1.0]),
            ("cell biology", vec![0.05, 0.0, 0.95]),
        ]))
    }

    fn scenario() -> Vec<String> {
        labels(&[
            "neural networks",
            "deep learning",
            "photosynthesis",
            "cell biology",
            "neural nets",
        ])
    }

    #[test]
    fn test_clean_subtopics() {
        let raw = labels(&["  Cell   Biology ", "cell biology", "x", "Genetics", ""]);
        assert_eq!(clean_subtopics(&raw, 2, 100), vec!["Cell Biology", "Genetics"]);
    }

    #[test]
    fn test_clean_subtopics_length_bounds() {
        let long = "a".repeat(101);
        let raw = vec![long, "ok".to_string()];
        assert_eq!(clean_subtopics(&raw, 2, 100), vec!["ok"]);
    }

    #[test]
    fn test_candidate_range() {
        assert_eq!(candidate_range(5, 2), (2, 4));
        assert_eq!(candidate_range(50, 10), (3, 20));
        assert_eq!(candidate_range(12, 10), (3, 11));
        assert_eq!(candidate_range(4, 1), (1, 2));
    }

    #[test]
    fn test_empty_input() {
        let clusterer = TopicClusterer::new(ml_bio_embedder(), TopicsConfig::default());
        let result = clusterer.normalize(&[]);
        assert!(result.normalized_topics.is_empty());
        assert!(result.topic_mapping.is_empty());
        assert_eq!(result.method, NormalizationMethod::Empty);
        assert_eq!(
            result.statistics.normalization_quality,
            NormalizationQuality::NoData
        );
    }

    #[test]
    fn test_few_subtopics_one_to_one() {
        let clusterer = TopicClusterer::new(
            Arc::new(FailingEmbedder {
                info: ModelInfo {
                    name: "failing".to_string(),
                    dimension: 3,
                },
            }),
            TopicsConfig::default(),
        );
        let result = clusterer.normalize_with_target(&labels(&["genetics", "ecology"]), 5);
        assert_eq!(result.method, NormalizationMethod::OneToOne);
        assert_eq!(result.normalized_topics.len(), 2);
        for topic in &result.normalized_topics {
            assert_eq!(topic.subtopic_count, 1);
            assert_eq!(topic.name, topic.members[0]);
            assert!((topic.cohesion_score - 1.0).abs() < f32::EPSILON);
        }
        assert_eq!(result.normalized_topics[0].topic_id, "topic_001");
        assert_eq!(result.topic_for("ecology"), Some("ecology"));
        assert_eq!(
            result.statistics.normalization_quality,
            NormalizationQuality::Perfect
        );
    }

    #[test]
    fn test_clusters_two_themes() {
        let clusterer = TopicClusterer::new(ml_bio_embedder(), TopicsConfig::default());
        let result = clusterer.normalize_with_target(&scenario(), 2);

        assert_eq!(result.method, NormalizationMethod::EmbeddingClustering);
        assert_eq!(result.normalized_topics.len(), 2);

        let ml = &result.normalized_topics[0];
        assert_eq!(ml.topic_id, "topic_001");
        assert_eq!(ml.members, vec!["neural networks", "deep learning", "neural nets"]);
        assert!(ml.cohesion_score > 0.5);

        let bio = &result.normalized_topics[1];
        assert_eq!(bio.members, vec!["photosynthesis", "cell biology"]);
        assert_eq!(result.topic_mapping.len(), 5);
    }

    #[test]
    fn test_topics_carry_member_statistics() {
        let clusterer = TopicClusterer::new(ml_bio_embedder(), TopicsConfig::default());
        let result = clusterer.normalize_with_target(&scenario(), 2);

        let ml = &result.normalized_topics[0];
        assert!((ml.average_word_count - 2.0).abs() < 1e-9);
        // "neural nets" .. "neural networks"
        assert_eq!((ml.min_length, ml.max_length), (11, 15));

        let bio = &result.normalized_topics[1];
        assert!((bio.average_word_count - 1.5).abs() < 1e-9);
        // "cell biology" .. "photosynthesis"
        assert_eq!((bio.min_length, bio.max_length), (12, 14));
    }

    #[test]
    fn test_assistant_names_each_cluster_once() {
        let namer = Arc::new(CountingNamer {
            calls: AtomicUsize::new(0),
        });
        let clusterer = TopicClusterer::new(ml_bio_embedder(), TopicsConfig::default())
            .with_naming_assistant(namer.clone());
        let result = clusterer.normalize_with_target(&scenario(), 2);

        assert_eq!(namer.calls.load(Ordering::SeqCst), 2);
        assert_eq!(result.topic_names(), vec!["Machine Learning", "Biology"]);
        assert_eq!(result.topic_for("neural nets"), Some("Machine Learning"));
        assert_eq!(result.topic_for("photosynthesis"), Some("Biology"));
    }

    #[test]
    fn test_frequency_names_without_assistant() {
        let clusterer = TopicClusterer::new(ml_bio_embedder(), TopicsConfig::default());
        let result = clusterer.normalize_with_target(&scenario(), 2);
        assert_eq!(result.normalized_topics[0].name, "Neural Networks Deep");
        assert_eq!(result.normalized_topics[1].name, "Photosynthesis Cell Biology");
    }

    #[test]
    fn test_embedding_failure_uses_lexical_fallback() {
        let clusterer = TopicClusterer::new(
            Arc::new(FailingEmbedder {
                info: ModelInfo {
                    name: "failing".to_string(),
                    dimension: 3,
                },
            }),
            TopicsConfig::default(),
        );
        let result = clusterer.normalize_with_target(&scenario(), 2);

        assert_eq!(result.method, NormalizationMethod::LexicalFallback);
        assert_eq!(
            result.statistics.normalization_quality,
            NormalizationQuality::Fallback
        );
        assert_eq!(result.normalized_topics.len(), 2);
        let total: usize = result.normalized_topics.iter().map(|t| t.subtopic_count).sum();
        assert_eq!(total, 5);
        assert_eq!(result.topic_mapping.len(), 5);
    }

    #[test]
    fn test_every_subtopic_mapped_once() {
        let subtopics: Vec<String> = (0..30)
            .map(|i| format!("{} concept {}", ["algebra", "biology", "chemistry"][i % 3], i))
            .collect();
        let clusterer = TopicClusterer::new(
            Arc::new(HashingEmbedder::default()),
            TopicsConfig::default(),
        );
        let result = clusterer.normalize_with_target(&subtopics, 3);

        let mut seen: Vec<&str> = result
            .normalized_topics
            .iter()
            .flat_map(|t| t.members.iter().map(String::as_str))
            .collect();
        seen.sort();
        let mut expected: Vec<&str> = subtopics.iter().map(String::as_str).collect();
        expected.sort();
        assert_eq!(seen, expected);

        for subtopic in &subtopics {
            let name = result.topic_for(subtopic);
            assert!(name.is_some());
        }
    }

    #[test]
    fn test_deterministic() {
        let subtopics: Vec<String> = (0..20).map(|i| format!("subject area {}", i % 7 + i)).collect();
        let clusterer = TopicClusterer::new(
            Arc::new(HashingEmbedder::default()),
            TopicsConfig::default(),
        );
        let a = clusterer.normalize_with_target(&subtopics, 4);
        let b = clusterer.normalize_with_target(&subtopics, 4);
        assert_eq!(a, b);
    }

    #[test]
    fn test_topics_sorted_by_size() {
        let subtopics: Vec<String> = (0..25).map(|i| format!("topic label {i}")).collect();
        let clusterer = TopicClusterer::new(
            Arc::new(HashingEmbedder::default()),
            TopicsConfig::default(),
        );
        let result = clusterer.normalize_with_target(&subtopics, 3);
        let sizes: Vec<usize> = result
            .normalized_topics
            .iter()
            .map(|t| t.subtopic_count)
            .collect();
        assert!(sizes.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_unique_name() {
        let mut used = HashMap::new();
        assert_eq!(unique_name("Genetics", &mut used), "Genetics");
        assert_eq!(unique_name("genetics", &mut used), "genetics 2");
        assert_eq!(unique_name("Genetics", &mut used), "Genetics 3");
        assert_eq!(unique_name("Ecology", &mut used), "Ecology");
    }

    #[test]
    fn test_representative_nearest_mean() {
        let members = labels(&["a", "b", "c"]);
        let a = vec![0.0, 0.0];
        let b = vec![1.0, 0.0];
        let c = vec![2.0, 0.0];
        let vectors: Vec<&[f32]> = vec![&a, &b, &c];
        assert_eq!(representative_of(&members, &vectors), "b");
    }
}
