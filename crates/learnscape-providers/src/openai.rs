//! OpenAI-compatible API evaluator implementation.
//!
//! Works against any chat-completions endpoint with the same wire shape,
//! which covers most self-hosted gateways.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use learnscape_core::error::EvaluatorError;
use learnscape_core::model::{EvaluationResult, Question};
use learnscape_core::traits::{
    EvaluateRequest, ExamEvaluator, GenerateQuestionsRequest, QuestionGenerator,
};

use crate::error::ProviderError;
use crate::prompt::{
    build_evaluation_prompt, build_generation_prompt, parse_evaluation_reply,
    parse_questions_reply, EVALUATION_SYSTEM_PROMPT, GENERATION_SYSTEM_PROMPT,
};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_MODEL: &str = "gpt-4.1-mini";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// OpenAI-compatible API provider.
pub struct OpenAiEvaluator {
    api_key: String,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl OpenAiEvaluator {
    pub fn new(api_key: &str, model: Option<String>, base_url: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("failed to build HTTP client");

        Self {
            api_key: api_key.to_string(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            client,
        }
    }

    async fn complete(&self, system: &str, prompt: &str) -> Result<String, ProviderError> {
        let body = OpenAiRequest {
            model: self.model.clone(),
            temperature: 0.0,
            messages: vec![
                OpenAiMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                OpenAiMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(DEFAULT_TIMEOUT_SECS)
                } else {
                    ProviderError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(5)
                * 1000;
            return Err(ProviderError::RateLimited {
                retry_after_ms: retry_after,
            });
        }
        if status == 401 {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::AuthenticationFailed(body));
        }
        if status == 404 {
            return Err(ProviderError::ModelNotFound(self.model.clone()));
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<OpenAiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(ProviderError::ApiError { status, message });
        }

        let api_response: OpenAiResponse =
            response.json().await.map_err(|e| ProviderError::ApiError {
                status: 0,
                message: format!("failed to parse response: {e}"),
            })?;

        api_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ProviderError::MalformedReply("response has no choices".into()))
    }
}

#[derive(Serialize)]
struct OpenAiRequest {
    model: String,
    temperature: f64,
    messages: Vec<OpenAiMessage>,
}

#[derive(Serialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiChoiceMessage,
}

#[derive(Deserialize)]
struct OpenAiChoiceMessage {
    content: String,
}

#[derive(Deserialize)]
struct OpenAiError {
    error: OpenAiErrorBody,
}

#[derive(Deserialize)]
struct OpenAiErrorBody {
    message: String,
}

#[async_trait]
impl ExamEvaluator for OpenAiEvaluator {
    fn name(&self) -> &str {
        "openai"
    }

    #[instrument(skip(self, request), fields(model = %self.model, questions = request.questions.len()))]
    async fn evaluate(
        &self,
        request: &EvaluateRequest,
    ) -> Result<EvaluationResult, EvaluatorError> {
        let prompt = build_evaluation_prompt(request);
        let reply = self
            .complete(EVALUATION_SYSTEM_PROMPT, &prompt)
            .await
            .map_err(EvaluatorError::from)?;
        parse_evaluation_reply(&reply, request.questions.len()).map_err(EvaluatorError::from)
    }
}

#[async_trait]
impl QuestionGenerator for OpenAiEvaluator {
    #[instrument(skip(self, request), fields(model = %self.model, topic = %request.topic))]
    async fn generate(
        &self,
        request: &GenerateQuestionsRequest,
    ) -> Result<Vec<Question>, EvaluatorError> {
        let prompt = build_generation_prompt(request);
        let reply = self
            .complete(GENERATION_SYSTEM_PROMPT, &prompt)
            .await
            .map_err(EvaluatorError::from)?;
        parse_questions_reply(&reply).map_err(EvaluatorError::from)
    }
}
