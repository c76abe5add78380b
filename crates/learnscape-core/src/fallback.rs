//! Deterministic offline evaluation.
//!
//! The always-available grading path: pure matcher application with no
//! external calls. This is the system's correctness safety net; it must
//! never fail.

use async_trait::async_trait;

use crate::error::EvaluatorError;
use crate::matcher::answer_matches;
use crate::model::EvaluationResult;
use crate::scoring;
use crate::traits::{EvaluateRequest, ExamEvaluator};

/// Grades with exact/substring matching, entirely in-process.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackEvaluator;

impl FallbackEvaluator {
    /// Grade every question positionally.
    ///
    /// Answers shorter than the question list are padded with empty
    /// strings (never correct); extra answers are ignored. The output
    /// length always equals the question count. Deterministic:
    /// identical inputs produce identical outputs.
    pub fn grade(&self, request: &EvaluateRequest) -> Vec<bool> {
        request
            .questions
            .iter()
            .enumerate()
            .map(|(idx, question)| answer_matches(question, request.answer(idx)))
            .collect()
    }
}

#[async_trait]
impl ExamEvaluator for FallbackEvaluator {
    fn name(&self) -> &str {
        "offline"
    }

    async fn evaluate(
        &self,
        request: &EvaluateRequest,
    ) -> Result<EvaluationResult, EvaluatorError> {
        Ok(scoring::assemble(self.grade(request)))
    }
}
