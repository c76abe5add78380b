//! Engine fallback behavior across the provider boundary.
//!
//! Verifies that whatever way the semantic tier fails, the engine hands
//! back exactly what the deterministic matcher would have produced, and
//! that a healthy semantic tier short-circuits the fallback entirely.

use std::sync::Arc;

use learnscape_core::engine::{EvaluationEngine, EvaluationPath};
use learnscape_core::model::{EvaluationResult, Question, QuestionType};
use learnscape_core::traits::EvaluateRequest;
use learnscape_providers::mock::MockEvaluator;

fn worksheet_request() -> EvaluateRequest {
    EvaluateRequest::new(
        vec![
            Question {
                text: "Siapa penemu gaya gravitasi?".into(),
                question_type: QuestionType::MultipleChoice,
                options: vec![
                    "Isaac Newton".into(),
                    "Albert Einstein".into(),
                    "Galileo Galilei".into(),
                    "Nikola Tesla".into(),
                ],
                correct_answer: "0".into(),
            },
            Question {
                text: "Berapakah hasil dari 15 x 3?".into(),
                question_type: QuestionType::Numeric,
                options: vec![],
                correct_answer: "45".into(),
            },
            Question {
                text: "Sebutkan faktor dari 32 selain 1 dan 32 yang berjumlah dua".into(),
                question_type: QuestionType::ShortAnswer,
                options: vec![],
                correct_answer: "4 dan 8".into(),
            },
            Question {
                text: "Berapakah 9 x 9?".into(),
                question_type: QuestionType::Numeric,
                options: vec![],
                correct_answer: "81".into(),
            },
        ],
        vec!["0".into(), "x = 45".into(), "8 dan 4".into(), "80".into()],
    )
}

#[tokio::test]
async fn semantic_failure_reproduces_offline_grading() {
    let mock = Arc::new(MockEvaluator::failing("503 from upstream"));
    let engine = EvaluationEngine::new(Some(mock.clone()));
    let offline = EvaluationEngine::offline();

    let request = worksheet_request();
    let degraded = engine.evaluate(&request).await;
    let reference = offline.evaluate(&request).await;

    assert_eq!(mock.call_count(), 1);
    assert_eq!(degraded.path, EvaluationPath::Fallback);
    assert_eq!(degraded.result, reference.result);
    assert_eq!(degraded.result.grading_results, vec![true, true, true, false]);
    assert_eq!(degraded.result.total_score, 75);
}

#[tokio::test]
async fn healthy_semantic_tier_is_authoritative() {
    // The semantic tier may disagree with the matcher; its well-formed
    // verdicts are returned unchanged.
    let semantic_result = EvaluationResult {
        grading_results: vec![true, true, true, true],
        total_score: 100,
    };
    let mock = Arc::new(MockEvaluator::with_result(semantic_result.clone()));
    let engine = EvaluationEngine::new(Some(mock.clone()));

    let outcome = engine.evaluate(&worksheet_request()).await;

    assert_eq!(outcome.path, EvaluationPath::Semantic);
    assert_eq!(outcome.result, semantic_result);
    assert_eq!(outcome.evaluated_by, "mock");
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn semantic_tier_is_tried_exactly_once() {
    let mock = Arc::new(MockEvaluator::failing("timeout"));
    let engine = EvaluationEngine::new(Some(mock.clone()));

    engine.evaluate(&worksheet_request()).await;
    assert_eq!(mock.call_count(), 1);

    engine.evaluate(&worksheet_request()).await;
    assert_eq!(mock.call_count(), 2);
}

#[tokio::test]
async fn shape_mismatch_from_semantic_tier_falls_back() {
    let wrong_shape = EvaluationResult {
        grading_results: vec![true, true],
        total_score: 100,
    };
    let engine = EvaluationEngine::new(Some(Arc::new(MockEvaluator::with_result(wrong_shape))));

    let outcome = engine.evaluate(&worksheet_request()).await;
    assert_eq!(outcome.path, EvaluationPath::Fallback);
    assert_eq!(outcome.result.grading_results.len(), 4);
}

#[tokio::test]
async fn semantic_tier_receives_full_submission() {
    let mock = Arc::new(MockEvaluator::failing("ignored"));
    let engine = EvaluationEngine::new(Some(mock.clone()));

    engine.evaluate(&worksheet_request()).await;

    let seen = mock.last_request().unwrap();
    assert_eq!(seen.questions.len(), 4);
    assert_eq!(seen.answers.len(), 4);
    assert_eq!(seen.answers[2], "8 dan 4");
}
