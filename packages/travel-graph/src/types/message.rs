//! Conversation history messages.

use serde::{Deserialize, Serialize};

/// Who produced a message.
///
/// Callers send free-form role labels; `user`, `human` and `humanmessage`
/// (any case) are the user, everything else is the assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "user" | "human" | "humanmessage" => Self::User,
            _ => Self::Assistant,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl From<String> for Role {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

/// One role-tagged message of the dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(alias = "type", default = "default_role")]
    pub role: Role,
    #[serde(alias = "text", default)]
    pub content: String,
}

fn default_role() -> Role {
    Role::User
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// The last `n` messages, oldest first.
pub fn recent(history: &[Message], n: usize) -> &[Message] {
    &history[history.len().saturating_sub(n)..]
}

/// Render messages as `role: content` lines for prompts.
pub fn render_transcript(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|m| format!("{}: {}", m.role.as_str(), m.content))
        .collect::<Vec<_>>()
        .join("\n")
}
