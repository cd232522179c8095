//! Phrasing trait for clarifying questions.

use async_trait::async_trait;

use crate::error::CapabilityResult;
use crate::types::classification::Slot;

/// Turns missing slots into one conversational paragraph.
#[async_trait]
pub trait Phraser: Send + Sync {
    /// Ask about `missing` (already prioritized, at most two slots).
    ///
    /// `facts` summarizes what is already known, e.g. `지역-부산`.
    async fn phrase(
        &self,
        facts: &[String],
        missing: &[Slot],
        utterance: &str,
    ) -> CapabilityResult<String>;

    /// Short name used in logs.
    fn name(&self) -> &str {
        "phraser"
    }
}
