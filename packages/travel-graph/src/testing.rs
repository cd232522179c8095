//! Testing utilities including mock implementations.
//!
//! These let applications exercise the graph without real LLM calls or a
//! real corpus backend.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::error::{CapabilityError, CapabilityResult, GraphError, Result};
use crate::pipeline::classify::parse_classification_response;
use crate::traits::{
    classifier::TravelClassifier,
    corpus::CandidateCorpus,
    phraser::Phraser,
};
use crate::types::{
    candidate::Candidate,
    classification::{Classification, Slot},
    message::Message,
};

/// What a mock answers with.
#[derive(Debug, Clone)]
enum Reply<T> {
    Value(T),
    Error(String),
    Malformed(String),
}

impl<T: Clone> Reply<T> {
    fn resolve(&self) -> CapabilityResult<T> {
        match self {
            Self::Value(value) => Ok(value.clone()),
            Self::Error(message) => Err(CapabilityError::Request(message.clone().into())),
            Self::Malformed(raw) => Err(CapabilityError::Malformed(raw.clone())),
        }
    }
}

/// Record of a call made to a mock capability.
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    Classify {
        utterance: String,
        context_len: usize,
    },
    Phrase {
        missing: Vec<Slot>,
        facts: Vec<String>,
    },
}

fn record(calls: &RwLock<Vec<MockCall>>, call: MockCall) {
    match calls.write() {
        Ok(mut calls) => calls.push(call),
        Err(poisoned) => poisoned.into_inner().push(call),
    }
}

fn snapshot(calls: &RwLock<Vec<MockCall>>) -> Vec<MockCall> {
    match calls.read() {
        Ok(calls) => calls.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

/// A scripted external classifier.
///
/// Answers every call the same way, optionally after a delay, and records
/// what it was asked.
pub struct MockClassifier {
    reply: Reply<Classification>,
    raw: Option<String>,
    delay: Option<Duration>,
    calls: Arc<RwLock<Vec<MockCall>>>,
}

impl MockClassifier {
    /// Always answer with `classification`.
    pub fn returning(classification: Classification) -> Self {
        Self {
            reply: Reply::Value(classification),
            raw: None,
            delay: None,
            calls: Arc::default(),
        }
    }

    /// Always fail with a request error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Reply::Error(message.into()),
            ..Self::returning(Classification::default())
        }
    }

    /// Always fail as if the provider returned unparseable output.
    pub fn malformed(raw: impl Into<String>) -> Self {
        Self {
            reply: Reply::Malformed(raw.into()),
            ..Self::returning(Classification::default())
        }
    }

    /// Answer with raw provider text, parsed the way a real adapter would.
    pub fn replying(raw: impl Into<String>) -> Self {
        Self {
            raw: Some(raw.into()),
            ..Self::returning(Classification::default())
        }
    }

    /// Sleep before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<MockCall> {
        snapshot(&self.calls)
    }

    pub fn call_count(&self) -> usize {
        self.calls().len()
    }
}

#[async_trait]
impl TravelClassifier for MockClassifier {
    async fn classify(
        &self,
        recent: &[Message],
        utterance: &str,
    ) -> CapabilityResult<Classification> {
        record(
            &self.calls,
            MockCall::Classify {
                utterance: utterance.to_string(),
                context_len: recent.len(),
            },
        );
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.raw {
            Some(raw) => parse_classification_response(raw),
            None => self.reply.resolve(),
        }
    }

    fn name(&self) -> &str {
        "mock-classifier"
    }
}

/// A scripted external phraser.
pub struct MockPhraser {
    reply: Reply<String>,
    delay: Option<Duration>,
    calls: Arc<RwLock<Vec<MockCall>>>,
}

impl MockPhraser {
    pub fn returning(text: impl Into<String>) -> Self {
        Self {
            reply: Reply::Value(text.into()),
            delay: None,
            calls: Arc::default(),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Reply::Error(message.into()),
            ..Self::returning("")
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<MockCall> {
        snapshot(&self.calls)
    }

    pub fn call_count(&self) -> usize {
        self.calls().len()
    }
}

#[async_trait]
impl Phraser for MockPhraser {
    async fn phrase(
        &self,
        facts: &[String],
        missing: &[Slot],
        _utterance: &str,
    ) -> CapabilityResult<String> {
        record(
            &self.calls,
            MockCall::Phrase {
                missing: missing.to_vec(),
                facts: facts.to_vec(),
            },
        );
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.reply.resolve()
    }

    fn name(&self) -> &str {
        "mock-phraser"
    }
}

/// A corpus whose every search fails.
#[derive(Debug, Clone)]
pub struct FailingCorpus {
    message: String,
}

impl FailingCorpus {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl CandidateCorpus for FailingCorpus {
    async fn search(&self) -> Result<Vec<Candidate>> {
        Err(GraphError::Corpus(self.message.clone().into()))
    }
}

/// A corpus that panics when searched.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanickingCorpus;

#[async_trait]
impl CandidateCorpus for PanickingCorpus {
    async fn search(&self) -> Result<Vec<Candidate>> {
        panic!("corpus backend crashed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::filters::Who;

    #[tokio::test]
    async fn test_mock_classifier_records_calls() {
        let mock = MockClassifier::returning(Classification {
            who: Who::Solo,
            ..Default::default()
        });
        let history = vec![Message::user("안녕")];

        let result = mock.classify(&history, "혼자 가요").await.unwrap();
        assert_eq!(result.who, Who::Solo);
        assert_eq!(
            mock.calls(),
            vec![MockCall::Classify {
                utterance: "혼자 가요".into(),
                context_len: 1,
            }]
        );
    }

    #[tokio::test]
    async fn test_mock_failures() {
        assert!(matches!(
            MockClassifier::failing("down").classify(&[], "x").await,
            Err(CapabilityError::Request(_))
        ));
        assert!(matches!(
            MockClassifier::malformed("not json").classify(&[], "x").await,
            Err(CapabilityError::Malformed(_))
        ));
        assert!(MockPhraser::failing("down").phrase(&[], &[], "x").await.is_err());
        assert!(FailingCorpus::new("gone").search().await.is_err());
    }
}
