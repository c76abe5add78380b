//! Prompt construction and reply parsing shared by the LLM evaluators.
//!
//! Every provider sends the same prompts and expects the same strict-JSON
//! replies; only the transport differs.

use serde::Deserialize;

use learnscape_core::model::{EvaluationResult, Question, QuestionType};
use learnscape_core::traits::{
    extract_json_from_markdown, EvaluateRequest, GenerateQuestionsRequest,
};

use crate::error::ProviderError;

/// System prompt for exam evaluation.
pub const EVALUATION_SYSTEM_PROMPT: &str = "You are an expert Indonesian teacher grading a student's digital worksheet. Respond with strict JSON only. No prose, no markdown.";

/// System prompt for question generation.
pub const GENERATION_SYSTEM_PROMPT: &str = "You are an expert educator authoring worksheet questions. Respond with strict JSON only. No prose, no markdown.";

/// Build the evaluation prompt: every question with its type, options,
/// key, and the student's answer, followed by the grading rules.
pub fn build_evaluation_prompt(request: &EvaluateRequest) -> String {
    let mut prompt = String::from("Evaluate a student's exam.\n\nQuestions and Answers:\n");

    for (idx, question) in request.questions.iter().enumerate() {
        prompt.push_str(&format!("Question {}: {}\n", idx + 1, question.text));
        prompt.push_str(&format!("Type: {}\n", question.question_type));
        if !question.options.is_empty() {
            let options = question
                .options
                .iter()
                .enumerate()
                .map(|(i, opt)| format!("[{i}] {opt}"))
                .collect::<Vec<_>>()
                .join(" ");
            prompt.push_str(&format!("Options: {options}\n"));
        }
        prompt.push_str(&format!(
            "Teacher's Correct Key: {}\n",
            question.correct_answer
        ));
        prompt.push_str(&format!("Student's Answer: {}\n---\n", request.answer(idx)));
    }

    prompt.push_str(EVALUATION_RULES);
    prompt
}

const EVALUATION_RULES: &str = r#"
Evaluation Rules:
1. For 'multiple-choice': the answer is an index string (e.g. "0", "1") and must match the teacher's key exactly.
2. For 'numeric' and 'short-answer': be flexible and semantic.
   - Accept answers that include units (e.g. "5 kg" is correct if the key is "5").
   - Accept answers with variables or prefixes (e.g. "x = 2" is correct if the key is "2").
   - Accept answers showing calculation steps as long as the final result matches the key.
   - For multiple values (e.g. "4 dan 8"), order does not matter ("8 dan 4" is also correct).
   - Ignore case and incidental whitespace.
3. An empty answer is always incorrect.
4. If the student's answer is logically equivalent to the teacher's key, mark it CORRECT (true).

Respond with JSON of the form {"gradingResults": [true, false, ...], "totalScore": N}
where gradingResults holds exactly one boolean per question, in order, and
totalScore is the percentage of correct answers (0-100)."#;

/// Wire shape of an evaluation reply. `totalScore` is accepted as a
/// float because models occasionally emit "66.7" for thirds.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EvaluationReply {
    grading_results: Vec<bool>,
    total_score: f64,
}

/// Parse and shape-check an evaluation reply.
pub fn parse_evaluation_reply(
    reply: &str,
    question_count: usize,
) -> Result<EvaluationResult, ProviderError> {
    let json = extract_json_from_markdown(reply);
    let parsed: EvaluationReply = serde_json::from_str(json)
        .map_err(|e| ProviderError::MalformedReply(format!("{e} in: {json}")))?;

    if !(0.0..=100.0).contains(&parsed.total_score) {
        return Err(ProviderError::MalformedReply(format!(
            "total score {} outside 0-100",
            parsed.total_score
        )));
    }

    let result = EvaluationResult {
        grading_results: parsed.grading_results,
        total_score: (parsed.total_score + 0.5).floor() as u8,
    };
    result
        .validate_shape(question_count)
        .map_err(|e| ProviderError::MalformedReply(e.to_string()))?;
    Ok(result)
}

/// Build the question-generation prompt.
pub fn build_generation_prompt(request: &GenerateQuestionsRequest) -> String {
    format!(
        r#"Generate {count} educational questions about "{topic}" for {class_level} students.

Requirements:
1. Mix question types: some multiple-choice, some numeric, and some short-answer.
2. For multiple-choice, provide exactly 4 options and a correctAnswer that is the option index ("0"-"3").
3. For numeric, the correctAnswer must be a number.
4. For short-answer, use common mathematical symbols if applicable.
5. Ensure questions are challenging but appropriate for the grade level.
6. Language: respond in Indonesian (Bahasa Indonesia).

Respond with JSON of the form
{{"questions": [{{"text": "...", "type": "multiple-choice|numeric|short-answer", "options": ["..."], "correctAnswer": "..."}}]}}
where options is omitted or empty for non-multiple-choice questions."#,
        count = request.count,
        topic = request.topic,
        class_level = request.class_level,
    )
}

#[derive(Deserialize)]
struct QuestionsReply {
    questions: Vec<WireQuestion>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireQuestion {
    text: String,
    #[serde(rename = "type")]
    question_type: QuestionType,
    #[serde(default)]
    options: Vec<String>,
    correct_answer: String,
}

/// Parse a question-generation reply.
pub fn parse_questions_reply(reply: &str) -> Result<Vec<Question>, ProviderError> {
    let json = extract_json_from_markdown(reply);
    let parsed: QuestionsReply = serde_json::from_str(json)
        .map_err(|e| ProviderError::MalformedReply(format!("{e} in: {json}")))?;

    if parsed.questions.is_empty() {
        return Err(ProviderError::MalformedReply(
            "reply contains no questions".into(),
        ));
    }

    Ok(parsed
        .questions
        .into_iter()
        .map(|q| Question {
            text: q.text,
            question_type: q.question_type,
            options: q.options,
            correct_answer: q.correct_answer,
        })
        .collect())
}
