//! Provider error types.

use learnscape_core::error::EvaluatorError;
use thiserror::Error;

/// Errors that can occur when talking to an evaluation service.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (invalid or missing API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested model was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The service replied, but not with the JSON we asked for.
    #[error("malformed reply: {0}")]
    MalformedReply(String),
}

impl From<ProviderError> for EvaluatorError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::MalformedReply(msg) => EvaluatorError::MalformedReply(msg),
            other => EvaluatorError::Service(other.to_string()),
        }
    }
}
