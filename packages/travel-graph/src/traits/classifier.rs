//! Classifier trait for persona/purpose/constraint extraction.

use async_trait::async_trait;

use crate::error::CapabilityResult;
use crate::types::{classification::Classification, message::Message};

/// Produces a [`Classification`] for the latest utterance.
///
/// Implementations may wrap an LLM (and so be slow or fail) or be purely
/// rule based. The classification stage never lets a failure escape: it falls
/// back to the keyword classifier.
#[async_trait]
pub trait TravelClassifier: Send + Sync {
    /// Classify `utterance` given the most recent messages (oldest first).
    async fn classify(
        &self,
        recent: &[Message],
        utterance: &str,
    ) -> CapabilityResult<Classification>;

    /// Short name used in logs.
    fn name(&self) -> &str {
        "classifier"
    }
}
