//! Evaluator trait seams shared by the deterministic and semantic paths.
//!
//! These async traits are implemented by `FallbackEvaluator` in this
//! crate and by the LLM-backed evaluators in `learnscape-providers`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::EvaluatorError;
use crate::model::{EvaluationResult, Question};

// ---------------------------------------------------------------------------
// Exam evaluation
// ---------------------------------------------------------------------------

/// One submission to evaluate: the full ordered question set plus the
/// student's raw answers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateRequest {
    /// The questions, in presentation order.
    pub questions: Vec<Question>,
    /// Raw answers, index-aligned with `questions`. May be shorter than
    /// the question list; missing entries count as unanswered.
    #[serde(default)]
    pub answers: Vec<String>,
}

impl EvaluateRequest {
    pub fn new(questions: Vec<Question>, answers: Vec<String>) -> Self {
        Self { questions, answers }
    }

    /// The answer for a question index, empty when the student skipped it.
    pub fn answer(&self, index: usize) -> &str {
        self.answers.get(index).map(String::as_str).unwrap_or("")
    }
}

/// A strategy that grades an entire submission in one call.
#[async_trait]
pub trait ExamEvaluator: Send + Sync {
    /// Short name used in logs and reports (e.g. "gemini", "offline").
    fn name(&self) -> &str;

    /// Grade the submission, producing one verdict per question.
    async fn evaluate(
        &self,
        request: &EvaluateRequest,
    ) -> Result<EvaluationResult, EvaluatorError>;
}

// ---------------------------------------------------------------------------
// Question generation
// ---------------------------------------------------------------------------

/// Request to author worksheet questions on a topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateQuestionsRequest {
    /// Subject matter, e.g. "Aljabar" or "Sel Tumbuhan".
    pub topic: String,
    /// Grade or class level, e.g. "Kelas 8".
    pub class_level: String,
    /// How many questions to produce (1-10).
    pub count: u8,
}

/// A service that authors worksheet questions from a topic.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    async fn generate(
        &self,
        request: &GenerateQuestionsRequest,
    ) -> Result<Vec<Question>, EvaluatorError>;
}

// ---------------------------------------------------------------------------
// Markdown JSON extraction
// ---------------------------------------------------------------------------

/// Extract the JSON payload from an LLM reply.
///
/// Handles:
/// - A ```json (or bare ```) fenced block, closed or truncated
/// - Raw JSON with surrounding prose (widest `{`..`}` span)
/// - Clean JSON, returned as-is
pub fn extract_json_from_markdown(reply: &str) -> &str {
    let trimmed = reply.trim();

    if let Some(start) = trimmed.find("```") {
        let after = &trimmed[start + 3..];
        // Skip the language tag line, if any
        let body_start = after.find('\n').map(|i| i + 1).unwrap_or(0);
        let body = &after[body_start..];
        let body_end = body.find("```").unwrap_or(body.len());
        let fenced = body[..body_end].trim();
        if !fenced.is_empty() {
            return fenced;
        }
    }

    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(open), Some(close)) if close > open => &trimmed[open..=close],
        _ => trimmed,
    }
}
