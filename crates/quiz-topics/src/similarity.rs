//! Vector similarity functions.
//!
//! Pure Rust implementations without external dependencies. Mismatched
//! dimensions never panic: similarity degrades to 0.0 so that a misbehaving
//! provider cannot crash a normalization pass.

/// Calculate cosine similarity between two vectors.
///
/// Returns value in [-1.0, 1.0] where 1.0 = identical direction.
/// Returns 0.0 for zero vectors or vectors of different dimension.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot_product / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// Squared Euclidean distance.
pub fn squared_euclidean(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Euclidean distance.
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    squared_euclidean(a, b).sqrt()
}

/// Arithmetic mean of vectors (not normalized).
pub fn mean_vector(vectors: &[&[f32]]) -> Vec<f32> {
    if vectors.is_empty() {
        return Vec::new();
    }

    let dim = vectors[0].len();
    let n = vectors.len() as f32;
    let mut mean = vec![0.0f32; dim];

    for vector in vectors {
        for (acc, &val) in mean.iter_mut().zip(vector.iter()) {
            *acc += val;
        }
    }

    for val in mean.iter_mut() {
        *val /= n;
    }

    mean
}

/// Build the full pairwise cosine similarity matrix.
///
/// The matrix is symmetric with 1.0 on the diagonal.
pub fn similarity_matrix(vectors: &[Vec<f32>]) -> Vec<Vec<f32>> {
    let n = vectors.len();
    let mut matrix = vec![vec![0.0f32; n]; n];

    for i in 0..n {
        matrix[i][i] = 1.0;
        for j in (i + 1)..n {
            let sim = cosine_similarity(&vectors[i], &vectors[j]);
            matrix[i][j] = sim;
            matrix[j][i] = sim;
        }
    }

    matrix
}

/// Calculate pairwise Euclidean distances between vectors.
pub fn pairwise_distances(vectors: &[Vec<f32>]) -> Vec<Vec<f64>> {
    let n = vectors.len();
    let mut distances = vec![vec![0.0f64; n]; n];

    for i in 0..n {
        for j in (i + 1)..n {
            let dist = euclidean_distance(&vectors[i], &vectors[j]) as f64;
            distances[i][j] = dist;
            distances[j][i] = dist;
        }
    }

    distances
}

/// Mean pairwise cosine similarity of a group, clamped to [0, 1].
///
/// Groups with fewer than two members have cohesion 1.0.
pub fn mean_pairwise_similarity(vectors: &[&[f32]]) -> f32 {
    let n = vectors.len();
    if n <= 1 {
        return 1.0;
    }

    let mut total = 0.0f32;
    let mut pairs = 0usize;
    for i in 0..n {
        for j in (i + 1)..n {
            total += cosine_similarity(vectors[i], vectors[j]);
            pairs += 1;
        }
    }

    (total / pairs as f32).clamp(0.0, 1.0)
}
