//! "Try the external capability, else fall back" combinator.
//!
//! Used for both classification and phrasing. The primary is optional (no
//! credential configured means no primary); every call to it runs under a
//! deadline, and any timeout, error or rejected output hands the request to
//! the fallback. A timed-out call is dropped, so a late answer is discarded.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{CapabilityError, CapabilityResult};
use crate::traits::{classifier::TravelClassifier, phraser::Phraser};
use crate::types::{
    classification::{Classification, Slot},
    message::Message,
};

/// Await `call` for at most `timeout`.
pub async fn with_deadline<T, F>(timeout: Duration, call: F) -> CapabilityResult<T>
where
    F: Future<Output = CapabilityResult<T>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(CapabilityError::Timeout { after: timeout }),
    }
}

/// A primary capability guarded by a deterministic fallback.
pub struct Fallback<P: ?Sized, F> {
    primary: Option<Arc<P>>,
    fallback: F,
    timeout: Duration,
    min_chars: usize,
}

impl<P: ?Sized, F> Fallback<P, F> {
    /// Combine an optional primary with a fallback.
    pub fn new(primary: Option<Arc<P>>, fallback: F, timeout: Duration) -> Self {
        Self {
            primary,
            fallback,
            timeout,
            min_chars: 0,
        }
    }

    /// Reject text output whose trimmed length is `chars` or less.
    pub fn with_min_chars(mut self, chars: usize) -> Self {
        self.min_chars = chars;
        self
    }

    /// Whether an external capability is configured at all.
    #[cfg(test)]
    fn has_primary(&self) -> bool {
        self.primary.is_some()
    }
}

#[async_trait]
impl<P, F> TravelClassifier for Fallback<P, F>
where
    P: TravelClassifier + ?Sized,
    F: TravelClassifier,
{
    async fn classify(
        &self,
        recent: &[Message],
        utterance: &str,
    ) -> CapabilityResult<Classification> {
        match &self.primary {
            Some(primary) => {
                match with_deadline(self.timeout, primary.classify(recent, utterance)).await {
                    Ok(classification) => return Ok(classification),
                    Err(e) => warn!(
                        capability = primary.name(),
                        error = %e,
                        "External classifier failed, using {}",
                        self.fallback.name()
                    ),
                }
            }
            None => debug!("No external classifier configured"),
        }

        self.fallback.classify(recent, utterance).await
    }

    fn name(&self) -> &str {
        "fallback"
    }
}

#[async_trait]
impl<P, F> Phraser for Fallback<P, F>
where
    P: Phraser + ?Sized,
    F: Phraser,
{
    async fn phrase(
        &self,
        facts: &[String],
        missing: &[Slot],
        utterance: &str,
    ) -> CapabilityResult<String> {
        match &self.primary {
            Some(primary) => {
                let attempt = with_deadline(self.timeout, primary.phrase(facts, missing, utterance))
                    .await
                    .and_then(|text| {
                        let text = text.trim().to_string();
                        let len = text.chars().count();
                        if len > self.min_chars {
                            Ok(text)
                        } else {
                            Err(CapabilityError::Trivial { len })
                        }
                    });

                match attempt {
                    Ok(text) => return Ok(text),
                    Err(e) => warn!(
                        capability = primary.name(),
                        error = %e,
                        "External phrasing failed, using {}",
                        self.fallback.name()
                    ),
                }
            }
            None => debug!("No external phraser configured"),
        }

        self.fallback.phrase(facts, missing, utterance).await
    }

    fn name(&self) -> &str {
        "fallback"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::classify::{classify_by_keywords, KeywordClassifier};
    use crate::pipeline::clarify::TemplatePhraser;
    use crate::testing::{MockClassifier, MockPhraser};
    use crate::types::filters::Who;

    const TIMEOUT: Duration = Duration::from_secs(10);

    #[tokio::test]
    async fn test_no_primary_uses_fallback() {
        let combined: Fallback<dyn TravelClassifier, _> =
            Fallback::new(None, KeywordClassifier, TIMEOUT);

        let result = combined.classify(&[], "혼자 힐링").await.unwrap();
        assert_eq!(result, classify_by_keywords("혼자 힐링"));
        assert!(!combined.has_primary());
    }

    #[tokio::test]
    async fn test_primary_result_wins() {
        let mock = Arc::new(MockClassifier::returning(Classification {
            who: Who::Couple,
            ..Default::default()
        }));
        let combined = Fallback::new(Some(mock.clone()), KeywordClassifier, TIMEOUT);

        let result = combined.classify(&[], "혼자 힐링").await.unwrap();
        assert_eq!(result.who, Who::Couple);
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_error_falls_back() {
        let mock = Arc::new(MockClassifier::failing("quota exceeded"));
        let combined = Fallback::new(Some(mock), KeywordClassifier, TIMEOUT);

        let result = combined.classify(&[], "부모님 모시고 온천").await.unwrap();
        assert_eq!(result.who, Who::ParentsTrip);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_falls_back() {
        let mock = Arc::new(
            MockClassifier::returning(Classification {
                who: Who::Couple,
                ..Default::default()
            })
            .with_delay(Duration::from_secs(60)),
        );
        let combined = Fallback::new(Some(mock), KeywordClassifier, TIMEOUT);

        let result = combined.classify(&[], "혼자 여행").await.unwrap();
        assert_eq!(result, classify_by_keywords("혼자 여행"));
    }

    #[tokio::test]
    async fn test_trivial_phrase_is_rejected() {
        let mock = Arc::new(MockPhraser::returning("어디요?"));
        let combined = Fallback::new(Some(mock), TemplatePhraser, TIMEOUT).with_min_chars(10);

        let text = combined.phrase(&[], &[Slot::Who], "여행").await.unwrap();
        assert_ne!(text, "어디요?");
        assert!(text.contains("누구와"));
    }

    #[tokio::test]
    async fn test_phrase_is_trimmed_and_accepted() {
        let mock = Arc::new(MockPhraser::returning(
            "  그러셨군요! 누구와 함께 가시는지 여쭤봐도 될까요?  ",
        ));
        let combined = Fallback::new(Some(mock), TemplatePhraser, TIMEOUT).with_min_chars(10);

        let text = combined.phrase(&[], &[Slot::Who], "여행").await.unwrap();
        assert_eq!(text, "그러셨군요! 누구와 함께 가시는지 여쭤봐도 될까요?");
    }
}
