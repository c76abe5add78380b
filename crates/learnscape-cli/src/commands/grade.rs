//! The `learnscape grade` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use uuid::Uuid;

use learnscape_core::engine::{EvaluationEngine, EvaluationPath, GradedOutcome};
use learnscape_core::model::{Question, QuestionType, Worksheet};
use learnscape_core::parser;
use learnscape_core::report::GradedSubmission;
use learnscape_core::traits::EvaluateRequest;
use learnscape_providers::config::load_config_from;
use learnscape_providers::create_evaluator;

pub async fn execute(
    worksheet_path: PathBuf,
    answers_path: PathBuf,
    student: String,
    offline: bool,
    output: PathBuf,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let worksheet = parser::parse_worksheet(&worksheet_path)?;

    let warnings = parser::validate_worksheet(&worksheet);
    for w in &warnings {
        let prefix = w
            .question
            .map(|n| format!("  [question {n}]"))
            .unwrap_or_else(|| "  ".to_string());
        eprintln!("{prefix} WARNING: {}", w.message);
    }

    let answers_json = std::fs::read_to_string(&answers_path)
        .with_context(|| format!("failed to read answers file: {}", answers_path.display()))?;
    let answers: Vec<String> = serde_json::from_str(&answers_json)
        .with_context(|| format!("failed to parse answers JSON: {}", answers_path.display()))?;

    let engine = if offline {
        EvaluationEngine::offline()
    } else {
        build_engine(config_path)?
    };

    let request = EvaluateRequest::new(worksheet.questions.clone(), answers.clone());
    let outcome = engine.evaluate(&request).await;

    if !offline && outcome.path == EvaluationPath::Fallback {
        eprintln!("Semantic evaluator unavailable; graded with the deterministic matcher.");
    }

    print_verdicts(&worksheet, &request, &outcome);

    let correct = outcome
        .result
        .grading_results
        .iter()
        .filter(|&&ok| ok)
        .count();
    println!(
        "\nScore: {}/100 ({} of {} correct)",
        outcome.result.total_score,
        correct,
        worksheet.questions.len()
    );

    let submission = GradedSubmission {
        id: Uuid::new_v4(),
        student_name: student,
        class_level: worksheet.class_level.clone(),
        created_at: Utc::now(),
        answers,
        total_questions: worksheet.questions.len(),
        result: outcome.result,
        evaluated_by: outcome.evaluated_by,
    };

    std::fs::create_dir_all(&output)?;
    let path = output.join(format!("submission-{}.json", submission.id));
    submission.save_json(&path)?;
    eprintln!("Submission saved to: {}", path.display());

    Ok(())
}

fn build_engine(config_path: Option<PathBuf>) -> Result<EvaluationEngine> {
    let config = load_config_from(config_path.as_deref())?;
    match config.providers.get(&config.default_provider) {
        Some(provider_config) => {
            let evaluator = create_evaluator(provider_config)?;
            Ok(EvaluationEngine::new(Some(Arc::from(evaluator))))
        }
        None => {
            eprintln!(
                "No '{}' provider configured; grading offline.",
                config.default_provider
            );
            Ok(EvaluationEngine::offline())
        }
    }
}

fn print_verdicts(worksheet: &Worksheet, request: &EvaluateRequest, outcome: &GradedOutcome) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Answer", "Key", "Verdict"]);

    for (idx, question) in worksheet.questions.iter().enumerate() {
        let verdict = if outcome.result.grading_results[idx] {
            "correct"
        } else {
            "incorrect"
        };
        table.add_row(vec![
            Cell::new(idx + 1),
            Cell::new(&question.text),
            Cell::new(display_answer(question, request.answer(idx))),
            Cell::new(display_key(question)),
            Cell::new(verdict),
        ]);
    }

    println!("{table}");
}

/// Resolve a multiple-choice index to its option text for display.
fn display_answer(question: &Question, answer: &str) -> String {
    if answer.trim().is_empty() {
        return "(unanswered)".to_string();
    }
    if question.question_type == QuestionType::MultipleChoice {
        if let Ok(idx) = answer.trim().parse::<usize>() {
            if let Some(option) = question.options.get(idx) {
                return format!("[{idx}] {option}");
            }
        }
    }
    answer.to_string()
}

fn display_key(question: &Question) -> String {
    if question.question_type == QuestionType::MultipleChoice {
        if let Some(idx) = question.correct_option_index() {
            return format!("[{idx}] {}", question.options[idx]);
        }
    }
    question.correct_answer.clone()
}
