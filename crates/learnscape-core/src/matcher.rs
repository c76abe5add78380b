//! Type-aware comparison between one student answer and one answer key.

use crate::model::{Question, QuestionType};
use crate::normalize::{normalize_loose, normalize_strict, split_multi_value};

/// Decide whether a raw student answer is correct for a question,
/// without any external call.
///
/// Multiple-choice answers are index strings compared exactly; numeric
/// and short answers go through loose normalization with substring
/// containment, plus order-free set comparison for multi-value keys.
/// An empty answer never matches, regardless of the key.
pub fn answer_matches(question: &Question, answer: &str) -> bool {
    if normalize_strict(answer).is_empty() {
        return false;
    }

    match question.question_type {
        QuestionType::MultipleChoice => matches_choice(question, answer),
        QuestionType::Numeric | QuestionType::ShortAnswer => {
            matches_value(&question.correct_answer, answer)
        }
    }
}

/// Indices are not natural language: no normalization, no coercion.
/// "01" does not match a key of "1".
fn matches_choice(question: &Question, answer: &str) -> bool {
    if question.correct_option_index().is_none() {
        // A key that does not resolve to one of the options can never
        // be answered correctly.
        return false;
    }
    answer.trim() == question.correct_answer.trim()
}

fn matches_value(key: &str, answer: &str) -> bool {
    let norm_answer = normalize_loose(answer);
    let norm_key = normalize_loose(key);
    if norm_answer.is_empty() || norm_key.is_empty() {
        return false;
    }

    // Mutual containment handles extraneous units and prefixes:
    // "5kg" contains key "5"; key "x=45" contains answer "45".
    if norm_answer.contains(&norm_key) || norm_key.contains(&norm_answer) {
        return true;
    }

    // Multi-value keys compare as sets: "8 dan 4" is "4 dan 8".
    let key_values = split_multi_value(key);
    key_values.len() > 1 && split_multi_value(answer) == key_values
}
