//! Typed errors for the travel graph.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use std::time::Duration;

use thiserror::Error;

/// Errors that end a turn early.
///
/// None of these reach the caller as a fault: the orchestrator turns them
/// into a [`TurnResult`](crate::types::turn::TurnResult) with `error` set.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The whole turn ran past its time budget
    #[error("turn timed out after {}s", after.as_secs())]
    TurnTimeout { after: Duration },

    /// A stage failed unexpectedly (including panics in the turn task)
    #[error("stage '{stage}' failed: {reason}")]
    StageFault { stage: String, reason: String },

    /// Candidate corpus could not be read
    #[error("corpus error: {0}")]
    Corpus(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Favorites store failed
    #[error("favorites store error: {0}")]
    Favorites(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl GraphError {
    /// Wrap any error raised inside a named stage.
    pub fn stage(stage: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::StageFault {
            stage: stage.into(),
            reason: reason.to_string(),
        }
    }
}

/// Failures of an external capability (classifier or phraser).
///
/// Always recovered locally by the deterministic fallback; they are logged,
/// never surfaced in a turn result.
#[derive(Debug, Error)]
pub enum CapabilityError {
    /// No credential or implementation configured
    #[error("capability unavailable: {0}")]
    Unavailable(String),

    /// The call exceeded its time budget
    #[error("capability timed out after {}s", after.as_secs())]
    Timeout { after: Duration },

    /// Output could not be parsed into the expected structure
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Output was too short to be useful
    #[error("trivial response ({len} chars)")]
    Trivial { len: usize },

    /// Transport or provider error
    #[error("request failed: {0}")]
    Request(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<serde_json::Error> for CapabilityError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}

/// Result type alias for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Result type alias for capability calls.
pub type CapabilityResult<T> = std::result::Result<T, CapabilityError>;
