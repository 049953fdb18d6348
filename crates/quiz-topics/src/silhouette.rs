//! Silhouette coefficient for scoring a partition.

use std::collections::BTreeMap;

use crate::similarity::pairwise_distances;

/// Mean silhouette coefficient of a labelling, using Euclidean distance.
///
/// Ranges over [-1.0, 1.0]; higher means tighter, better separated clusters.
/// Returns 0.0 when there are fewer than two clusters or every point is its
/// own cluster.
pub fn silhouette_score(vectors: &[Vec<f32>], labels: &[usize]) -> f64 {
    if vectors.len() != labels.len() {
        return 0.0;
    }
    silhouette_from_distances(&pairwise_distances(vectors), labels)
}

/// Silhouette coefficient from a precomputed distance matrix.
pub fn silhouette_from_distances(distances: &[Vec<f64>], labels: &[usize]) -> f64 {
    let n = labels.len();
    if distances.len() != n {
        return 0.0;
    }

    let mut sizes: BTreeMap<usize, usize> = BTreeMap::new();
    for &label in labels {
        *sizes.entry(label).or_insert(0) += 1;
    }
    let num_clusters = sizes.len();
    if num_clusters <= 1 || num_clusters >= n {
        return 0.0;
    }

    let mut total = 0.0f64;
    for i in 0..n {
        let own = labels[i];
        // singleton members contribute 0
        if sizes.get(&own).copied().unwrap_or(0) <= 1 {
            continue;
        }

        let mut sums: BTreeMap<usize, f64> = BTreeMap::new();
        for j in 0..n {
            if i != j {
                *sums.entry(labels[j]).or_insert(0.0) += distances[i][j];
            }
        }

        let mut a = 0.0;
        let mut b = f64::MAX;
        for (&label, &sum) in &sums {
            let size = sizes.get(&label).copied().unwrap_or(0);
            if label == own {
                a = sum / (size - 1) as f64;
            } else if size > 0 {
                b = b.min(sum / size as f64);
            }
        }
        if b == f64::MAX {
            continue;
        }

        let denom = a.max(b);
        if denom > 0.0 {
            total += (b - a) / denom;
        }
    }

    total / n as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_separated_clusters_score_high() {
        let vectors = vec![
            vec![0.0, 0.0],
            vec![0.0, 0.1],
            vec![10.0, 10.0],
            vec![10.0, 10.1],
        ];
        let score = silhouette_score(&vectors, &[0, 0, 1, 1]);
        assert!(score > 0.9, "score was {score}");
    }

    #[test]
    fn test_bad_labelling_scores_lower() {
        let vectors = vec![
            vec![0.0, 0.0],
            vec![0.0, 0.1],
            vec![10.0, 10.0],
            vec![10.0, 10.1],
        ];
        let good = silhouette_score(&vectors, &[0, 0, 1, 1]);
        let bad = silhouette_score(&vectors, &[0, 1, 0, 1]);
        assert!(bad < good);
        assert!(bad < 0.0);
    }

    #[test]
    fn test_single_cluster_is_zero() {
        let vectors = vec![vec![0.0], vec![1.0], vec![2.0]];
        assert_eq!(silhouette_score(&vectors, &[0, 0, 0]), 0.0);
    }

    #[test]
    fn test_all_singletons_is_zero() {
        let vectors = vec![vec![0.0], vec![1.0], vec![2.0]];
        assert_eq!(silhouette_score(&vectors, &[0, 1, 2]), 0.0);
    }

    #[test]
    fn test_singleton_members_contribute_zero() {
        // point 2 is alone; the pair (0,1) is tight and far from it
        let vectors = vec![vec![0.0], vec![0.1], vec![10.0]];
        let score = silhouette_score(&vectors, &[0, 0, 1]);
        // two points near 1.0, singleton adds 0, mean over 3
        assert!(score > 0.6 && score < 0.67, "score was {score}");
    }

    #[test]
    fn test_length_mismatch_is_zero() {
        let vectors = vec![vec![0.0], vec![1.0]];
        assert_eq!(silhouette_score(&vectors, &[0]), 0.0);
    }
}
