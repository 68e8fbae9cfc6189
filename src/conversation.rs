//! Conversation primitives shared by the orchestrator and its callers.

use serde::{Deserialize, Serialize};

/// Conversation participant role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System note or instruction.
    System,
    /// Human user message.
    User,
    /// Assistant (model) message.
    Assistant,
}

impl Role {
    /// Wire name used by chat completion APIs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A single entry in the caller-owned conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    /// Who authored the message.
    pub role: Role,
    /// Message text.
    pub content: String,
    /// Display timestamp (e.g. `"14:05"`), if the caller tracks one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl ConversationMessage {
    /// Create a message without a timestamp.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: None,
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Create a system note.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Stamp the message with the current local time as `HH:MM`.
    pub fn stamped_now(mut self) -> Self {
        self.timestamp = Some(display_timestamp(chrono::Local::now()));
        self
    }
}

/// Format a time the way chat transcripts display it.
pub fn display_timestamp<Tz>(at: chrono::DateTime<Tz>) -> String
where
    Tz: chrono::TimeZone,
    Tz::Offset: std::fmt::Display,
{
    at.format("%H:%M").to_string()
}
