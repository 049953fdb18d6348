//! Diversity-aware question selection.
//!
//! Selection is greedy and not globally optimal: candidates are visited in
//! descending quality order and accepted only if they are dissimilar to
//! everything already picked. Any remaining slots are then filled with the
//! best unpicked candidates regardless of similarity.

use std::sync::Arc;

use quiz_embeddings::{EmbeddingModel, DEFAULT_CHUNK_SIZE};
use quiz_types::Question;
use tracing::{debug, info};

use crate::config::DiversityConfig;
use crate::matrix::SimilarityMatrix;
use crate::scoring::quality_score;

/// Picks a high-quality, diverse subset of a question group.
pub struct DiversitySelector {
    embedder: Arc<dyn EmbeddingModel>,
    config: DiversityConfig,
    chunk_size: usize,
}

impl DiversitySelector {
    /// Create a selector.
    pub fn new(embedder: Arc<dyn EmbeddingModel>, config: DiversityConfig) -> Self {
        Self {
            embedder,
            config,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Set the maximum number of texts per embedding call.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Get the configuration.
    pub fn config(&self) -> &DiversityConfig {
        &self.config
    }

    /// Select exactly `min(group.len(), max_count)` questions.
    ///
    /// Groups that already fit are returned unchanged. Otherwise the result
    /// is in selection order and always starts with the highest-scoring
    /// question.
    pub fn select(&self, group: Vec<Question>, max_count: usize) -> Vec<Question> {
        if group.len() <= max_count {
            return group;
        }
        if max_count == 0 {
            return Vec::new();
        }

        let scores: Vec<f32> = group.iter().map(quality_score).collect();
        let mut order: Vec<usize> = (0..group.len()).collect();
        // stable: equal scores keep input order
        order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

        let matrix = SimilarityMatrix::build(&group, self.embedder.as_ref(), self.chunk_size);
        let threshold = self.config.diversity_threshold;

        let mut selected: Vec<usize> = Vec::with_capacity(max_count);
        for &candidate in &order {
            if selected.len() >= max_count {
                break;
            }
            if selected
                .iter()
                .all(|&picked| matrix.get(candidate, picked) < threshold)
            {
                selected.push(candidate);
            }
        }

        let diverse = selected.len();
        for &candidate in &order {
            if selected.len() >= max_count {
                break;
            }
            if !selected.contains(&candidate) {
                selected.push(candidate);
            }
        }

        debug!(
            group = group.len(),
            max_count,
            diverse,
            filled = selected.len() - diverse,
            method = ?matrix.method(),
            "Selected diverse questions"
        );

        let mut slots: Vec<Option<Question>> = group.into_iter().map(Some).collect();
        selected
            .into_iter()
            .filter_map(|index| slots[index].take())
            .collect()
    }

    /// Cap every normalized topic at `max_per_topic` questions.
    ///
    /// Questions are grouped by normalized topic ("General" when unassigned)
    /// in order of first appearance, and each group goes through
    /// [`select`](Self::select).
    pub fn select_per_topic(&self, questions: Vec<Question>, max_per_topic: usize) -> Vec<Question> {
        let total = questions.len();
        let mut groups: Vec<(String, Vec<Question>)> = Vec::new();

        for question in questions {
            let topic = question.topic_or_general().to_string();
            match groups.iter_mut().find(|(name, _)| *name == topic) {
                Some((_, members)) => members.push(question),
                None => groups.push((topic, vec![question])),
            }
        }

        let topics = groups.len();
        let selected: Vec<Question> = groups
            .into_iter()
            .flat_map(|(_, members)| self.select(members, max_per_topic))
            .collect();

        info!(
            questions = total,
            topics,
            selected = selected.len(),
            max_per_topic,
            "Topic-based selection complete"
        );
        selected
    }
}
