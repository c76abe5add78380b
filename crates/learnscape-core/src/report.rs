//! Graded submission persistence.
//!
//! The engine produces an `EvaluationResult`; the caller owns it. This
//! module is the JSON artifact that caller persists and reloads.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::EvaluationResult;

/// A scored submission, ready to persist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradedSubmission {
    /// Unique submission identifier.
    pub id: Uuid,
    /// Name the student entered.
    pub student_name: String,
    /// Class the worksheet belongs to.
    pub class_level: String,
    /// When the submission was graded.
    pub created_at: DateTime<Utc>,
    /// Raw answers exactly as submitted.
    pub answers: Vec<String>,
    /// Number of questions on the worksheet.
    pub total_questions: usize,
    /// Per-question verdicts and the aggregate score.
    pub result: EvaluationResult,
    /// Name of the evaluator that produced the verdicts.
    pub evaluated_by: String,
}

impl GradedSubmission {
    /// Save the submission as pretty JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize submission")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write submission to {}", path.display()))?;
        Ok(())
    }

    /// Load a submission from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read submission from {}", path.display()))?;
        let submission: GradedSubmission =
            serde_json::from_str(&content).context("failed to parse submission JSON")?;
        Ok(submission)
    }
}
