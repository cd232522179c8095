//! Configuration for the turn orchestrator.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Lowest allowed per-call budget for external capabilities, in seconds.
pub const MIN_LLM_TIMEOUT_SECS: u64 = 10;

/// Lowest allowed budget for a whole turn, in seconds.
pub const MIN_GRAPH_TIMEOUT_SECS: u64 = 15;

/// Configuration for a [`TravelGraph`](crate::TravelGraph).
///
/// Timeouts below their floors are raised to the floor when read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Budget for each classifier or phrasing call.
    ///
    /// Default: 25 seconds (floor 10).
    pub llm_timeout_secs: u64,

    /// Budget for the whole turn.
    ///
    /// Should exceed the per-call budget so the fallback path can still
    /// finish after a slow external call. Default: 60 seconds (floor 15).
    pub graph_timeout_secs: u64,

    /// Phrased questions this short or shorter are rejected.
    ///
    /// Default: 10 characters.
    pub min_question_chars: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            llm_timeout_secs: 25,
            graph_timeout_secs: 60,
            min_question_chars: 10,
        }
    }
}

impl GraphConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-call budget in seconds.
    pub fn with_llm_timeout_secs(mut self, secs: u64) -> Self {
        self.llm_timeout_secs = secs;
        self
    }

    /// Set the whole-turn budget in seconds.
    pub fn with_graph_timeout_secs(mut self, secs: u64) -> Self {
        self.graph_timeout_secs = secs;
        self
    }

    /// Set the minimum accepted length of a phrased question.
    pub fn with_min_question_chars(mut self, chars: usize) -> Self {
        self.min_question_chars = chars;
        self
    }

    /// Per-call budget, never below the floor.
    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs.max(MIN_LLM_TIMEOUT_SECS))
    }

    /// Whole-turn budget, never below the floor.
    pub fn graph_timeout(&self) -> Duration {
        Duration::from_secs(self.graph_timeout_secs.max(MIN_GRAPH_TIMEOUT_SECS))
    }

    /// Whether a clarify turn can spend the full per-call budget on both the
    /// classifier and the phraser and still finish on the fallback path.
    pub fn covers_two_external_calls(&self) -> bool {
        self.graph_timeout() > self.llm_timeout() * 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GraphConfig::default();
        assert_eq!(config.llm_timeout(), Duration::from_secs(25));
        assert_eq!(config.graph_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_floors_are_enforced() {
        let config = GraphConfig::new()
            .with_llm_timeout_secs(1)
            .with_graph_timeout_secs(0);
        assert_eq!(config.llm_timeout(), Duration::from_secs(10));
        assert_eq!(config.graph_timeout(), Duration::from_secs(15));
    }

    #[test]
    fn test_two_call_headroom() {
        assert!(GraphConfig::default().covers_two_external_calls());
        assert!(!GraphConfig::new()
            .with_llm_timeout_secs(40)
            .covers_two_external_calls());
        assert!(!GraphConfig::new()
            .with_llm_timeout_secs(30)
            .covers_two_external_calls());
    }
}
