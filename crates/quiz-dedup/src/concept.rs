//! Secondary duplicate test.
//!
//! High text similarity alone is not enough to merge two questions: they
//! must also share a format, agree on their answers and test the same
//! concept.

use std::collections::HashSet;

use quiz_topics::jaccard_similarity;
use quiz_types::Question;

use crate::config::ConceptConfig;

/// Whether `first` and `second` are duplicates, given they are already
/// similar enough by the primary signal.
///
/// All of the following must hold:
/// - same question type
/// - when both answers are non-empty, their Jaccard similarity reaches the
///   answer threshold
/// - they test the same concept (see [`same_concept`])
pub fn is_duplicate(first: &Question, second: &Question, config: &ConceptConfig) -> bool {
    if first.question_type != second.question_type {
        return false;
    }

    let answer_a = first.answer.trim();
    let answer_b = second.answer.trim();
    if !answer_a.is_empty()
        && !answer_b.is_empty()
        && jaccard_similarity(answer_a, answer_b) < config.answer_similarity_threshold
    {
        return false;
    }

    same_concept(first, second, config)
}

/// Whether two questions test the same concept.
///
/// True when their subtopics match case-insensitively, their normalized
/// topics match, or their texts share enough significant keywords.
pub fn same_concept(first: &Question, second: &Question, config: &ConceptConfig) -> bool {
    let subtopic_a = first.subtopic.trim().to_lowercase();
    let subtopic_b = second.subtopic.trim().to_lowercase();
    if !subtopic_a.is_empty() && subtopic_a == subtopic_b {
        return true;
    }

    if let (Some(topic_a), Some(topic_b)) = (&first.normalized_topic, &second.normalized_topic) {
        let topic_a = topic_a.trim().to_lowercase();
        if !topic_a.is_empty() && topic_a == topic_b.trim().to_lowercase() {
            return true;
        }
    }

    let keywords_a = significant_keywords(&first.question_text, &config.stopwords);
    let keywords_b = significant_keywords(&second.question_text, &config.stopwords);
    keywords_a.intersection(&keywords_b).count() >= config.min_shared_keywords
}

/// Lowercased words of `text` minus `stopwords`.
pub fn significant_keywords(text: &str, stopwords: &[String]) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .filter(|w| !stopwords.iter().any(|s| s == w))
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_types::QuestionType;

    fn short(id: &str, text: &str, answer: &str) -> Question {
        Question::new(id, text, answer, QuestionType::ShortAnswer)
    }

    #[test]
    fn test_identical_questions_are_duplicates() {
        let config = ConceptConfig::default();
        let a = short("q1", "What is the powerhouse of the cell?", "mitochondria");
        let b = short("q2", "What is the powerhouse of the cell?", "mitochondria");
        assert!(is_duplicate(&a, &b, &config));
    }

    #[test]
    fn test_different_types_not_duplicates() {
        let config = ConceptConfig::default();
        let a = short("q1", "What is the powerhouse of the cell?", "mitochondria");
        let b = Question::new(
            "q2",
            "What is the powerhouse of the cell?",
            "mitochondria",
            QuestionType::Mcq,
        );
        assert!(!is_duplicate(&a, &b, &config));
    }

    #[test]
    fn test_contradictory_answers_not_duplicates() {
        let config = ConceptConfig::default();
        let a = short("q1", "Which organelle produces ATP?", "mitochondria");
        let b = short("q2", "Which organelle produces ATP?", "the ribosome");
        assert!(!is_duplicate(&a, &b, &config));
    }

    #[test]
    fn test_empty_answer_skips_answer_check() {
        let config = ConceptConfig::default();
        let a = short("q1", "Which organelle produces ATP?", "mitochondria");
        let b = short("q2", "Which organelle produces ATP?", "");
        assert!(is_duplicate(&a, &b, &config));
    }

    #[test]
    fn test_same_subtopic_is_same_concept() {
        let config = ConceptConfig::default();
        let a = short("q1", "Define osmosis.", "").with_subtopic("Cell Transport");
        let b = short("q2", "Explain diffusion.", "").with_subtopic("cell transport");
        assert!(same_concept(&a, &b, &config));
    }

    #[test]
    fn test_same_topic_is_same_concept() {
        let config = ConceptConfig::default();
        let a = short("q1", "Define osmosis.", "").with_topic("Biology");
        let b = short("q2", "Explain diffusion.", "").with_topic("Biology");
        assert!(same_concept(&a, &b, &config));
    }

    #[test]
    fn test_keyword_overlap_is_same_concept() {
        let config = ConceptConfig::default();
        let a = short("q1", "What does the mitochondria produce in a cell?", "");
        let b = short("q2", "Why is the mitochondria important to the cell?", "");
        assert!(same_concept(&a, &b, &config));
    }

    #[test]
    fn test_unrelated_texts_not_same_concept() {
        let config = ConceptConfig::default();
        let a = short("q1", "Define osmosis.", "").with_subtopic("transport");
        let b = short("q2", "Who wrote Hamlet?", "").with_subtopic("literature");
        assert!(!same_concept(&a, &b, &config));
    }

    #[test]
    fn test_significant_keywords() {
        let config = ConceptConfig::default();
        let words = significant_keywords("The role of the nucleus, in a cell", &config.stopwords);
        let mut words: Vec<String> = words.into_iter().collect();
        words.sort();
        assert_eq!(words, vec!["cell", "nucleus", "role"]);
    }
}
