//! K-means partitioning.
//!
//! Lloyd iterations with k-means++ seeding. The random source is a
//! `StdRng` seeded from the caller's seed, so identical inputs always yield
//! identical labels.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Restart and iteration limits for one partition call.
#[derive(Debug, Clone, Copy)]
pub struct KMeansParams {
    /// Number of independent seeded restarts; the lowest-inertia run wins
    pub n_init: usize,
    /// Maximum Lloyd iterations per restart
    pub max_iterations: usize,
}

impl Default for KMeansParams {
    fn default() -> Self {
        Self {
            n_init: 10,
            max_iterations: 300,
        }
    }
}

/// Labels plus the within-cluster sum of squared distances.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    /// Cluster label per input vector, numbered by first appearance
    pub labels: Vec<usize>,
    /// Sum of squared distances from each point to its centroid
    pub inertia: f64,
}

/// Partition `vectors` into at most `k` clusters with default parameters.
///
/// `k == 0` or empty input yields no labels; `k >= n` puts every point in
/// its own cluster.
pub fn partition(vectors: &[Vec<f32>], k: usize, seed: u64) -> Vec<usize> {
    partition_with(vectors, k, seed, &KMeansParams::default()).labels
}

/// Partition `vectors` into at most `k` clusters.
pub fn partition_with(
    vectors: &[Vec<f32>],
    k: usize,
    seed: u64,
    params: &KMeansParams,
) -> Partition {
    let n = vectors.len();
    if n == 0 || k == 0 {
        return Partition {
            labels: Vec::new(),
            inertia: 0.0,
        };
    }
    if k >= n {
        return Partition {
            labels: (0..n).collect(),
            inertia: 0.0,
        };
    }

    let points: Vec<Vec<f64>> = vectors
        .iter()
        .map(|v| v.iter().map(|&x| x as f64).collect())
        .collect();

    let mut rng = StdRng::seed_from_u64(seed);
    let mut best: Option<Partition> = None;

    for _ in 0..params.n_init.max(1) {
        let centroids = seed_centroids(&points, k, &mut rng);
        let candidate = lloyd(&points, centroids, params.max_iterations.max(1));
        let better = match &best {
            Some(current) => candidate.inertia < current.inertia,
            None => true,
        };
        if better {
            best = Some(candidate);
        }
    }

    match best {
        Some(mut result) => {
            result.labels = canonicalize(&result.labels);
            result
        }
        None => Partition {
            labels: vec![0; n],
            inertia: 0.0,
        },
    }
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Index of the nearest centroid; lowest index wins ties.
fn nearest(point: &[f64], centroids: &[Vec<f64>]) -> (usize, f64) {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (index, centroid) in centroids.iter().enumerate() {
        let dist = squared_distance(point, centroid);
        if dist < best_dist {
            best = index;
            best_dist = dist;
        }
    }
    (best, best_dist)
}

/// k-means++ seeding: each next centroid is drawn with probability
/// proportional to its squared distance from the nearest chosen centroid.
fn seed_centroids(points: &[Vec<f64>], k: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
    let n = points.len();
    let mut centroids: Vec<Vec<f64>> = Vec::with_capacity(k);
    centroids.push(points[rng.random_range(0..n)].clone());

    let mut min_dist: Vec<f64> = points
        .iter()
        .map(|p| squared_distance(p, &centroids[0]))
        .collect();

    while centroids.len() < k {
        let total: f64 = min_dist.iter().sum();
        let next = if total <= 0.0 {
            // every point coincides with a chosen centroid
            rng.random_range(0..n)
        } else {
            let mut target = rng.random::<f64>() * total;
            let mut chosen = n - 1;
            for (index, dist) in min_dist.iter().enumerate() {
                if target < *dist {
                    chosen = index;
                    break;
                }
                target -= dist;
            }
            chosen
        };

        let centroid = points[next].clone();
        for (index, point) in points.iter().enumerate() {
            let dist = squared_distance(point, &centroid);
            if dist < min_dist[index] {
                min_dist[index] = dist;
            }
        }
        centroids.push(centroid);
    }

    centroids
}

fn assign(points: &[Vec<f64>], centroids: &[Vec<f64>], labels: &mut [usize]) -> bool {
    let mut changed = false;
    for (index, point) in points.iter().enumerate() {
        let (label, _) = nearest(point, centroids);
        if labels[index] != label {
            labels[index] = label;
            changed = true;
        }
    }
    changed
}

fn update_centroids(points: &[Vec<f64>], labels: &[usize], centroids: &mut [Vec<f64>]) {
    let k = centroids.len();
    let dim = points[0].len();
    let mut sums = vec![vec![0.0f64; dim]; k];
    let mut counts = vec![0usize; k];

    for (point, &label) in points.iter().zip(labels.iter()) {
        counts[label] += 1;
        for (acc, &val) in sums[label].iter_mut().zip(point.iter()) {
            *acc += val;
        }
    }

    for (cluster, sum) in sums.into_iter().enumerate() {
        if counts[cluster] > 0 {
            let count = counts[cluster] as f64;
            centroids[cluster] = sum.into_iter().map(|v| v / count).collect();
        }
    }

    // Empty clusters take the point farthest from its own centroid, drawn
    // only from clusters that can spare a member.
    for cluster in 0..k {
        if counts[cluster] > 0 {
            continue;
        }
        let mut farthest: Option<(usize, f64)> = None;
        for (index, point) in points.iter().enumerate() {
            let owner = labels[index];
            if counts[owner] < 2 {
                continue;
            }
            let dist = squared_distance(point, &centroids[owner]);
            let better = match farthest {
                Some((_, best)) => dist > best,
                None => true,
            };
            if better {
                farthest = Some((index, dist));
            }
        }
        if let Some((index, _)) = farthest {
            counts[labels[index]] -= 1;
            counts[cluster] += 1;
            centroids[cluster] = points[index].clone();
        }
    }
}

fn lloyd(points: &[Vec<f64>], mut centroids: Vec<Vec<f64>>, max_iterations: usize) -> Partition {
    let mut labels = vec![usize::MAX; points.len()];

    for _ in 0..max_iterations {
        let changed = assign(points, &centroids, &mut labels);
        if !changed {
            break;
        }
        update_centroids(points, &labels, &mut centroids);
    }
    assign(points, &centroids, &mut labels);

    let inertia = points
        .iter()
        .zip(labels.iter())
        .map(|(point, &label)| squared_distance(point, &centroids[label]))
        .sum();

    Partition { labels, inertia }
}

/// Renumber labels in order of first appearance.
fn canonicalize(labels: &[usize]) -> Vec<usize> {
    let mut mapping: Vec<(usize, usize)> = Vec::new();
    labels
        .iter()
        .map(|&label| match mapping.iter().find(|(old, _)| *old == label) {
            Some(&(_, new)) => new,
            None => {
                let new = mapping.len();
                mapping.push((label, new));
                new
            }
        })
        .collect()
}
