//! Mock evaluator for testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use learnscape_core::error::EvaluatorError;
use learnscape_core::model::EvaluationResult;
use learnscape_core::traits::{EvaluateRequest, ExamEvaluator};

/// A scriptable semantic evaluator for testing the engine without real
/// API calls: returns a fixed result or a scripted failure.
pub struct MockEvaluator {
    outcome: Result<EvaluationResult, String>,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last request received.
    last_request: Mutex<Option<EvaluateRequest>>,
}

impl MockEvaluator {
    /// A mock that always returns the given result.
    pub fn with_result(result: EvaluationResult) -> Self {
        Self {
            outcome: Ok(result),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// A mock that always fails with a service error.
    pub fn failing(message: &str) -> Self {
        Self {
            outcome: Err(message.to_string()),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Get the number of calls made to this evaluator.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last request made to this evaluator.
    pub fn last_request(&self) -> Option<EvaluateRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExamEvaluator for MockEvaluator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn evaluate(
        &self,
        request: &EvaluateRequest,
    ) -> Result<EvaluationResult, EvaluatorError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_request.lock().unwrap() = Some(request.clone());

        match &self.outcome {
            Ok(result) => Ok(result.clone()),
            Err(message) => Err(EvaluatorError::Service(message.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use learnscape_core::model::{Question, QuestionType};

    fn request() -> EvaluateRequest {
        EvaluateRequest::new(
            vec![Question {
                text: "q".into(),
                question_type: QuestionType::Numeric,
                options: vec![],
                correct_answer: "1".into(),
            }],
            vec!["1".into()],
        )
    }

    #[tokio::test]
    async fn fixed_result() {
        let mock = MockEvaluator::with_result(EvaluationResult {
            grading_results: vec![true],
            total_score: 100,
        });

        let result = mock.evaluate(&request()).await.unwrap();
        assert_eq!(result.total_score, 100);
        assert_eq!(mock.call_count(), 1);
        assert_eq!(mock.last_request().unwrap().answers, vec!["1"]);
    }

    #[tokio::test]
    async fn scripted_failure() {
        let mock = MockEvaluator::failing("service exploded");

        let err = mock.evaluate(&request()).await.unwrap_err();
        assert!(err.to_string().contains("service exploded"));
        assert_eq!(mock.call_count(), 1);
    }
}
