//! TOML worksheet parser.
//!
//! Loads worksheets from TOML files and directories, validates them, and
//! serializes generated worksheets back to TOML.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::{Question, QuestionType, Worksheet};

/// Intermediate TOML structure for worksheet files.
#[derive(Debug, Serialize, Deserialize)]
struct TomlWorksheetFile {
    worksheet: TomlWorksheetHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TomlWorksheetHeader {
    id: String,
    name: String,
    #[serde(default)]
    class_level: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct TomlQuestion {
    text: String,
    #[serde(rename = "type")]
    question_type: String,
    #[serde(default)]
    options: Vec<String>,
    correct_answer: String,
}

/// Parse a single TOML file into a `Worksheet`.
pub fn parse_worksheet(path: &Path) -> Result<Worksheet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read worksheet file: {}", path.display()))?;

    parse_worksheet_str(&content, path)
}

/// Parse a TOML string into a `Worksheet` (useful for testing).
pub fn parse_worksheet_str(content: &str, source_path: &Path) -> Result<Worksheet> {
    let parsed: TomlWorksheetFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(|q| {
            let question_type: QuestionType = q
                .question_type
                .parse()
                .map_err(|e: String| anyhow::anyhow!("{}", e))?;

            Ok(Question {
                text: q.text,
                question_type,
                options: q.options,
                correct_answer: q.correct_answer,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Worksheet {
        id: parsed.worksheet.id,
        name: parsed.worksheet.name,
        class_level: parsed.worksheet.class_level,
        description: parsed.worksheet.description,
        questions,
    })
}

/// Serialize a worksheet to TOML, e.g. for AI-generated sheets.
pub fn worksheet_to_toml(worksheet: &Worksheet) -> Result<String> {
    let file = TomlWorksheetFile {
        worksheet: TomlWorksheetHeader {
            id: worksheet.id.clone(),
            name: worksheet.name.clone(),
            class_level: worksheet.class_level.clone(),
            description: worksheet.description.clone(),
        },
        questions: worksheet
            .questions
            .iter()
            .map(|q| TomlQuestion {
                text: q.text.clone(),
                question_type: q.question_type.to_string(),
                options: q.options.clone(),
                correct_answer: q.correct_answer.clone(),
            })
            .collect(),
    };
    toml::to_string_pretty(&file).context("failed to serialize worksheet")
}

/// Recursively load all `.toml` worksheet files from a directory.
pub fn load_worksheet_directory(dir: &Path) -> Result<Vec<Worksheet>> {
    let mut sheets = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            sheets.extend(load_worksheet_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_worksheet(&path) {
                Ok(sheet) => sheets.push(sheet),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(sheets)
}

/// A warning from worksheet validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// 1-based question number, if the warning concerns one question.
    pub question: Option<usize>,
    /// Warning message.
    pub message: String,
}

/// Validate a worksheet for issues that would make grading meaningless.
pub fn validate_worksheet(worksheet: &Worksheet) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if worksheet.questions.is_empty() {
        warnings.push(ValidationWarning {
            question: None,
            message: "worksheet has no questions".into(),
        });
    }

    for (idx, q) in worksheet.questions.iter().enumerate() {
        let number = idx + 1;

        if q.text.trim().is_empty() {
            warnings.push(ValidationWarning {
                question: Some(number),
                message: "question text is empty".into(),
            });
        }

        if q.correct_answer.trim().is_empty() {
            warnings.push(ValidationWarning {
                question: Some(number),
                message: "correct answer is empty".into(),
            });
        }

        match q.question_type {
            QuestionType::MultipleChoice => {
                if q.options.is_empty() {
                    warnings.push(ValidationWarning {
                        question: Some(number),
                        message: "multiple-choice question has no options".into(),
                    });
                } else if q.correct_option_index().is_none() {
                    warnings.push(ValidationWarning {
                        question: Some(number),
                        message: format!(
                            "correct answer '{}' does not resolve to an option index (0-{})",
                            q.correct_answer,
                            q.options.len() - 1
                        ),
                    });
                }
            }
            QuestionType::Numeric | QuestionType::ShortAnswer => {
                if !q.options.is_empty() {
                    warnings.push(ValidationWarning {
                        question: Some(number),
                        message: format!(
                            "{} question should not carry options",
                            q.question_type
                        ),
                    });
                }
            }
        }
    }

    warnings
}
