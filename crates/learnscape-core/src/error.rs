//! Evaluator error types.
//!
//! A semantic evaluation failure is a value the engine branches on to
//! reach the deterministic fallback, not an exception crossing layers.
//! Defined in `learnscape-core` so the engine can classify failures
//! without string matching.

use thiserror::Error;

/// Errors a semantic evaluator can signal for a whole submission.
///
/// Any of these counts as total failure of the semantic path; partial
/// results are never trusted.
#[derive(Debug, Error)]
pub enum EvaluatorError {
    /// The external evaluation service failed (network, auth, HTTP error).
    #[error("evaluation service error: {0}")]
    Service(String),

    /// The service replied with something that is not the expected JSON.
    #[error("malformed evaluation reply: {0}")]
    MalformedReply(String),

    /// The reply parsed but does not line up with the submission.
    #[error("result shape mismatch: expected {expected} verdicts, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// The reply's total score is outside the 0-100 range.
    #[error("total score {0} outside 0-100")]
    ScoreOutOfRange(u8),
}
