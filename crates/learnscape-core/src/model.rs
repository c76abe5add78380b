//! Core data model types for learnscape.
//!
//! These are the fundamental types that the entire learnscape system uses
//! to represent worksheets, questions, and grading outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EvaluatorError;

/// How a question is answered, and therefore how it is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    MultipleChoice,
    Numeric,
    ShortAnswer,
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::MultipleChoice => write!(f, "multiple-choice"),
            QuestionType::Numeric => write!(f, "numeric"),
            QuestionType::ShortAnswer => write!(f, "short-answer"),
        }
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "multiple-choice" | "choice" => Ok(QuestionType::MultipleChoice),
            "numeric" | "number" => Ok(QuestionType::Numeric),
            "short-answer" | "essay" => Ok(QuestionType::ShortAnswer),
            other => Err(format!("unknown question type: {other}")),
        }
    }
}

/// A single worksheet question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Prompt shown to the student.
    pub text: String,
    /// Determines the matching strategy.
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// Answer options. Only meaningful for multiple-choice, where each
    /// option's position is its index; conventionally four entries.
    #[serde(default)]
    pub options: Vec<String>,
    /// The key: a decimal option index for multiple-choice, the literal
    /// value or expression for numeric/short-answer.
    pub correct_answer: String,
}

impl Question {
    /// Resolve the key to an option index, if it is one.
    ///
    /// Returns `None` for a non-numeric key or one outside the options
    /// range; such a question can never be answered correctly.
    pub fn correct_option_index(&self) -> Option<usize> {
        let idx = self.correct_answer.trim().parse::<usize>().ok()?;
        if idx < self.options.len() {
            Some(idx)
        } else {
            None
        }
    }
}

/// A digital worksheet (LKPD): the question set one grading run operates on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worksheet {
    /// Unique identifier for this worksheet.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Grade or class the worksheet targets (e.g. "Kelas 7").
    #[serde(default)]
    pub class_level: String,
    /// Description of this worksheet.
    #[serde(default)]
    pub description: String,
    /// The questions, in presentation order.
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// Outcome of evaluating one submission.
///
/// This is also the wire shape the semantic evaluation service replies
/// with, hence the camelCase field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    /// One verdict per question, in question order.
    pub grading_results: Vec<bool>,
    /// Percentage of correct answers, 0-100.
    pub total_score: u8,
}

impl EvaluationResult {
    /// Check that this result lines up with the submission it grades.
    ///
    /// A semantic reply failing this check is discarded wholesale; no
    /// partial results are trusted.
    pub fn validate_shape(&self, question_count: usize) -> Result<(), EvaluatorError> {
        if self.grading_results.len() != question_count {
            return Err(EvaluatorError::ShapeMismatch {
                expected: question_count,
                actual: self.grading_results.len(),
            });
        }
        if self.total_score > 100 {
            return Err(EvaluatorError::ScoreOutOfRange(self.total_score));
        }
        Ok(())
    }
}
