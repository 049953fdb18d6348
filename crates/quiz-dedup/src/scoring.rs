//! Question quality scoring.

use quiz_types::{Question, QuestionType};

/// Score assumed when a question carries no validation or confidence score.
pub const DEFAULT_COMPONENT_SCORE: f32 = 0.5;

const VALIDATION_WEIGHT: f32 = 0.4;
const CONFIDENCE_WEIGHT: f32 = 0.3;
const SWEET_SPOT_BONUS: f32 = 0.2;
const NEAR_SWEET_SPOT_BONUS: f32 = 0.1;
const SHORT_ANSWER_BONUS: f32 = 0.1;

/// Composite quality score in [0, 1].
///
/// `0.4 * validation + 0.3 * confidence`, plus 0.2 for 10-25 words (0.1 for
/// 5-9 or 26-40), plus 0.1 for short-answer questions. Non-finite component
/// scores count as 0.0, so the result is always finite.
pub fn quality_score(question: &Question) -> f32 {
    let validation = component(question.validation_score);
    let confidence = component(question.confidence_score);

    let mut score = validation * VALIDATION_WEIGHT + confidence * CONFIDENCE_WEIGHT;

    score += match question.word_count() {
        10..=25 => SWEET_SPOT_BONUS,
        5..=9 | 26..=40 => NEAR_SWEET_SPOT_BONUS,
        _ => 0.0,
    };

    if question.question_type == QuestionType::ShortAnswer {
        score += SHORT_ANSWER_BONUS;
    }

    score.clamp(0.0, 1.0)
}

fn component(score: Option<f32>) -> f32 {
    match score {
        Some(value) if value.is_finite() => value,
        Some(_) => 0.0,
        None => DEFAULT_COMPONENT_SCORE,
    }
}
