//! Evaluation coordination: semantic first, deterministic fallback.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::fallback::FallbackEvaluator;
use crate::model::EvaluationResult;
use crate::scoring;
use crate::traits::{EvaluateRequest, ExamEvaluator};

/// Which path produced a grading result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationPath {
    /// The external natural-language evaluator answered with a
    /// well-formed result.
    Semantic,
    /// The deterministic matcher graded the submission.
    Fallback,
}

/// Outcome of one grading run.
#[derive(Debug, Clone)]
pub struct GradedOutcome {
    pub result: EvaluationResult,
    pub path: EvaluationPath,
    /// Name of the evaluator that produced the verdicts.
    pub evaluated_by: String,
}

/// Coordinates the two evaluation tiers.
///
/// The semantic evaluator is tried exactly once; any failure — service
/// error, malformed reply, wrong result shape — falls through to the
/// deterministic matcher. No retries: a single failure immediately
/// triggers fallback, bounding latency on an unreliable external
/// dependency.
pub struct EvaluationEngine {
    semantic: Option<Arc<dyn ExamEvaluator>>,
    fallback: FallbackEvaluator,
}

impl EvaluationEngine {
    pub fn new(semantic: Option<Arc<dyn ExamEvaluator>>) -> Self {
        Self {
            semantic,
            fallback: FallbackEvaluator,
        }
    }

    /// An engine with no semantic tier; every call grades offline.
    pub fn offline() -> Self {
        Self::new(None)
    }

    /// Grade a submission. Never fails: every input combination yields
    /// a value, because the fallback path is total.
    pub async fn evaluate(&self, request: &EvaluateRequest) -> GradedOutcome {
        if let Some(semantic) = &self.semantic {
            match semantic.evaluate(request).await {
                Ok(result) => match result.validate_shape(request.questions.len()) {
                    Ok(()) => {
                        return GradedOutcome {
                            result,
                            path: EvaluationPath::Semantic,
                            evaluated_by: semantic.name().to_string(),
                        };
                    }
                    Err(e) => {
                        tracing::warn!(
                            evaluator = semantic.name(),
                            "semantic result rejected, grading offline: {e}"
                        );
                    }
                },
                Err(e) => {
                    tracing::warn!(
                        evaluator = semantic.name(),
                        "semantic evaluation failed, grading offline: {e}"
                    );
                }
            }
        }

        let result = scoring::assemble(self.fallback.grade(request));
        GradedOutcome {
            result,
            path: EvaluationPath::Fallback,
            evaluated_by: self.fallback.name().to_string(),
        }
    }
}
