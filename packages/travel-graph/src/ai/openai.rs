//! OpenAI implementation of the classifier and phraser traits.
//!
//! Talks to any OpenAI-compatible chat-completions endpoint.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use travel_graph::ai::OpenAI;
//!
//! let ai = Arc::new(OpenAI::new("sk-...").with_model("gpt-4o-mini"));
//! let graph = TravelGraph::new(corpus, favorites)
//!     .with_classifier(ai.clone())
//!     .with_phraser(ai);
//! ```

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretBox};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CapabilityError, CapabilityResult};
use crate::pipeline::{
    classify::parse_classification_response,
    prompts::{
        format_classifier_prompt, format_phraser_prompt, CLASSIFIER_SYSTEM_PROMPT,
        PHRASER_SYSTEM_PROMPT,
    },
};
use crate::traits::{classifier::TravelClassifier, phraser::Phraser};
use crate::types::{
    classification::{Classification, Slot},
    message::Message,
};

/// OpenAI-backed classifier and phraser.
///
/// Deterministic (temperature 0) classification; phrasing uses a little
/// temperature for a natural tone.
pub struct OpenAI {
    client: Client,
    api_key: SecretBox<str>,
    model: String,
    base_url: String,
}

impl OpenAI {
    /// Create a new OpenAI client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: SecretBox::new(Box::from(api_key.into().as_str())),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }

    /// Create from environment variable `OPENAI_API_KEY`.
    pub fn from_env() -> CapabilityResult<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| CapabilityError::Unavailable("OPENAI_API_KEY not set".into()))?;
        Ok(Self::new(api_key))
    }

    /// Set the chat model (default: gpt-4o-mini).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a custom base URL (for Azure, proxies, local servers, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn chat(&self, system: &str, user: &str, temperature: f32) -> CapabilityResult<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            temperature: Some(temperature),
            max_tokens: Some(512),
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| CapabilityError::Request(Box::new(e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(CapabilityError::Request(
                format!("OpenAI API error ({}): {}", status, error_text).into(),
            ));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| CapabilityError::Malformed(e.to_string()))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| CapabilityError::Malformed("no choices in response".into()))
    }
}

#[async_trait]
impl TravelClassifier for OpenAI {
    async fn classify(
        &self,
        recent: &[Message],
        utterance: &str,
    ) -> CapabilityResult<Classification> {
        let prompt = format_classifier_prompt(recent, utterance);
        let text = self.chat(CLASSIFIER_SYSTEM_PROMPT, &prompt, 0.0).await?;
        debug!(model = %self.model, chars = text.len(), "Classifier replied");
        parse_classification_response(&text)
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[async_trait]
impl Phraser for OpenAI {
    async fn phrase(
        &self,
        facts: &[String],
        missing: &[Slot],
        utterance: &str,
    ) -> CapabilityResult<String> {
        let prompt = format_phraser_prompt(facts, missing, utterance);
        self.chat(PHRASER_SYSTEM_PROMPT, &prompt, 0.3).await
    }

    fn name(&self) -> &str {
        "openai"
    }
}

// API types

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}
