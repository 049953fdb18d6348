//! Normalization run statistics.

use std::collections::HashSet;

use quiz_types::{NormalizationMethod, NormalizationQuality, NormalizationStatistics, NormalizedTopic};

/// Compute statistics for a finished normalization run.
///
/// Coverage is the share of `original` subtopics that appear in some topic.
/// Balance is `1 / (1 + std / mean)` over topic sizes (population standard
/// deviation). The quality verdict is graded only for clustered runs; the
/// other methods carry a fixed verdict.
pub fn calculate_statistics(
    topics: &[NormalizedTopic],
    original: &[String],
    method: NormalizationMethod,
) -> NormalizationStatistics {
    let total_subtopics = original.len();
    let total_topics = topics.len();

    let mapped: HashSet<&str> = topics
        .iter()
        .flat_map(|t| t.members.iter().map(String::as_str))
        .collect();
    let covered = original.iter().filter(|s| mapped.contains(s.as_str())).count();
    let coverage = if total_subtopics > 0 {
        covered as f64 / total_subtopics as f64
    } else {
        0.0
    };

    let (mean, std) = if total_topics > 0 {
        let sizes: Vec<f64> = topics.iter().map(|t| t.subtopic_count as f64).collect();
        let mean = sizes.iter().sum::<f64>() / total_topics as f64;
        let variance =
            sizes.iter().map(|s| (s - mean) * (s - mean)).sum::<f64>() / total_topics as f64;
        (mean, variance.sqrt())
    } else {
        (0.0, 0.0)
    };

    let balance = if mean > 0.0 { 1.0 / (1.0 + std / mean) } else { 0.0 };

    let cohesion = if total_topics > 0 {
        topics.iter().map(|t| t.cohesion_score as f64).sum::<f64>() / total_topics as f64
    } else {
        0.0
    };

    let quality = match method {
        NormalizationMethod::Empty => NormalizationQuality::NoData,
        NormalizationMethod::OneToOne => NormalizationQuality::Perfect,
        NormalizationMethod::LexicalFallback => NormalizationQuality::Fallback,
        NormalizationMethod::EmbeddingClustering => {
            NormalizationQuality::assess(coverage, balance, cohesion)
        }
    };

    NormalizationStatistics {
        total_original_subtopics: total_subtopics,
        total_normalized_topics: total_topics,
        coverage_percentage: coverage * 100.0,
        average_subtopics_per_topic: mean,
        subtopic_distribution_std: std,
        balance_score: balance,
        average_cohesion_score: cohesion,
        normalization_quality: quality,
    }
}
