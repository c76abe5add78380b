//! Gemini API evaluator implementation.

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

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Gemini API provider: the semantic evaluation tier.
pub struct GeminiEvaluator {
    api_key: String,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiEvaluator {
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

    /// One request-reply round trip; returns the first candidate's text.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, ProviderError> {
        let body = GeminiRequest {
            system_instruction: GeminiContent {
                parts: vec![GeminiPart {
                    text: system.to_string(),
                }],
            },
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.0,
                response_mime_type: "application/json".to_string(),
            },
        };

        let response = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", &self.api_key)
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
        if status == 401 || status == 403 {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::AuthenticationFailed(body));
        }
        if status == 404 {
            return Err(ProviderError::ModelNotFound(self.model.clone()));
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(ProviderError::ApiError { status, message });
        }

        let api_response: GeminiResponse =
            response.json().await.map_err(|e| ProviderError::ApiError {
                status: 0,
                message: format!("failed to parse response: {e}"),
            })?;

        api_response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| ProviderError::MalformedReply("response has no candidates".into()))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    system_instruction: GeminiContent,
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    response_mime_type: String,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Deserialize)]
struct GeminiErrorBody {
    message: String,
}

#[async_trait]
impl ExamEvaluator for GeminiEvaluator {
    fn name(&self) -> &str {
        "gemini"
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
impl QuestionGenerator for GeminiEvaluator {
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
