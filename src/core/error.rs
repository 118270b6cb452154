use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by the matching pipeline
#[derive(Debug, Error)]
pub enum MatchError {
    /// No judge is wired in at all. Invocation failures never surface here.
    #[error("Judge unavailable: hybrid matching requires a configured language model")]
    JudgeUnavailable,
}

/// Errors raised while invoking an external judge
#[derive(Debug, Error)]
pub enum JudgeError {
    #[error("Judge invocation failed: {0}")]
    Invocation(String),

    #[error("Judge timed out after {0:?}")]
    Timeout(Duration),
}
