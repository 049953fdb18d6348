//! Lexical grouping used when embeddings are unavailable.
//!
//! Each subtopic is keyed by its dominant keyword (the token it contains
//! that occurs in the most subtopics). Subtopics are ordered by that
//! keyword's frequency and cut into contiguous bands of near-equal size.

use std::collections::HashMap;

use crate::text::{jaccard_similarity, tokenize};

/// Group subtopic indices into at most `target_count` frequency bands.
///
/// Every index appears in exactly one band; bands are never empty.
pub fn lexical_bands(subtopics: &[String], target_count: usize) -> Vec<Vec<usize>> {
    let n = subtopics.len();
    if n == 0 || target_count == 0 {
        return Vec::new();
    }

    let tokens: Vec<Vec<String>> = subtopics.iter().map(|s| tokenize(s)).collect();

    // document frequency: each subtopic counts a token once
    let mut frequency: HashMap<&str, usize> = HashMap::new();
    for subtopic_tokens in &tokens {
        let mut seen: Vec<&str> = Vec::new();
        for token in subtopic_tokens {
            if !seen.contains(&token.as_str()) {
                seen.push(token.as_str());
                *frequency.entry(token.as_str()).or_insert(0) += 1;
            }
        }
    }

    let keyed: Vec<(usize, &str, usize)> = tokens
        .iter()
        .enumerate()
        .map(|(index, subtopic_tokens)| {
            let mut dominant: (&str, usize) = ("", 0);
            for token in subtopic_tokens {
                let count = frequency.get(token.as_str()).copied().unwrap_or(0);
                if count > dominant.1 {
                    dominant = (token.as_str(), count);
                }
            }
            (index, dominant.0, dominant.1)
        })
        .collect();

    let mut order = keyed;
    order.sort_by(|a, b| b.2.cmp(&a.2).then(a.1.cmp(b.1)).then(a.0.cmp(&b.0)));

    let band_count = target_count.min(n);
    let base = n / band_count;
    let extra = n % band_count;

    let mut bands = Vec::with_capacity(band_count);
    let mut cursor = 0;
    for band in 0..band_count {
        let size = base + usize::from(band < extra);
        bands.push(
            order[cursor..cursor + size]
                .iter()
                .map(|(index, _, _)| *index)
                .collect(),
        );
        cursor += size;
    }

    bands
}

/// Mean pairwise Jaccard similarity of a group; 1.0 for fewer than two members.
pub fn lexical_cohesion(members: &[String]) -> f32 {
    let n = members.len();
    if n <= 1 {
        return 1.0;
    }

    let mut total = 0.0f32;
    let mut pairs = 0usize;
    for i in 0..n {
        for j in (i + 1)..n {
            total += jaccard_similarity(&members[i], &members[j]);
            pairs += 1;
        }
    }

    (total / pairs as f32).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_bands_partition_every_index() {
        let subtopics = labels(&[
            "cell biology",
            "cell structure",
            "organic chemistry",
            "cell division",
            "chemistry basics",
        ]);
        let bands = lexical_bands(&subtopics, 2);
        assert_eq!(bands.len(), 2);
        assert_eq!(bands[0].len(), 3);
        assert_eq!(bands[1].len(), 2);

        let mut all: Vec<usize> = bands.concat();
        all.sort();
        assert_eq!(all, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_bands_group_by_dominant_keyword() {
        let subtopics = labels(&[
            "cell biology",
            "organic chemistry",
            "cell structure",
            "chemistry basics",
            "cell division",
        ]);
        let bands = lexical_bands(&subtopics, 2);
        // "cell" occurs three times and leads the ordering
        assert_eq!(bands[0], vec![0, 2, 4]);
        assert_eq!(bands[1], vec![1, 3]);
    }

    #[test]
    fn test_bands_never_exceed_input() {
        let subtopics = labels(&["genetics", "ecology"]);
        let bands = lexical_bands(&subtopics, 10);
        assert_eq!(bands, vec![vec![1], vec![0]]);
    }

    #[test]
    fn test_bands_empty() {
        assert!(lexical_bands(&[], 3).is_empty());
        assert!(lexical_bands(&labels(&["x"]), 0).is_empty());
    }

    #[test]
    fn test_lexical_cohesion() {
        assert_eq!(lexical_cohesion(&labels(&["genetics"])), 1.0);
        let cohesion = lexical_cohesion(&labels(&["cell biology", "cell structure"]));
        assert!((cohesion - 1.0 / 3.0).abs() < 0.001);
    }
}
