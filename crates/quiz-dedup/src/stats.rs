//! Deduplication run statistics.

use std::collections::BTreeMap;

use quiz_types::{DeduplicationStatistics, Question, SimilarityMethod};

/// Question count per normalized topic ("General" when unassigned).
pub fn topic_distribution(questions: &[Question]) -> BTreeMap<String, usize> {
    let mut distribution = BTreeMap::new();
    for question in questions {
        *distribution
            .entry(question.topic_or_general().to_string())
            .or_insert(0) += 1;
    }
    distribution
}

/// Mean over original topics of the share of questions kept.
pub fn topic_preservation_rate(
    original: &BTreeMap<String, usize>,
    unique: &BTreeMap<String, usize>,
) -> f64 {
    let rates: Vec<f64> = original
        .iter()
        .filter(|(_, count)| **count > 0)
        .map(|(topic, count)| unique.get(topic).copied().unwrap_or(0) as f64 / *count as f64)
        .collect();

    if rates.is_empty() {
        0.0
    } else {
        rates.iter().sum::<f64>() / rates.len() as f64
    }
}

/// Compute statistics for a finished deduplication run.
///
/// `removed_similarities` holds the similarity between each removed question
/// and its representative.
pub fn calculate_statistics(
    original: &[Question],
    unique: &[Question],
    removed_similarities: &[f32],
    method: SimilarityMethod,
) -> DeduplicationStatistics {
    let total_original = original.len();
    let total_unique = unique.len();
    let removed = total_original.saturating_sub(total_unique);

    let deduplication_rate = if total_original > 0 {
        removed as f64 / total_original as f64
    } else {
        0.0
    };

    let average_similarity_score = if removed_similarities.is_empty() {
        0.0
    } else {
        removed_similarities.iter().map(|&s| s as f64).sum::<f64>()
            / removed_similarities.len() as f64
    };

    let distribution_original = topic_distribution(original);
    let distribution_unique = topic_distribution(unique);
    let preservation = topic_preservation_rate(&distribution_original, &distribution_unique);

    DeduplicationStatistics {
        total_original,
        total_unique,
        total_duplicates_removed: removed,
        deduplication_rate,
        average_similarity_score,
        topic_distribution_original: distribution_original,
        topic_distribution_unique: distribution_unique,
        topic_preservation_rate: preservation,
        similarity_method: method,
    }
}
