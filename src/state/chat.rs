#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Assistant reply appended when an exchange fails.
pub const CHAT_ERROR_MESSAGE: &str = "Sorry, I encountered an error. Please try again.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// A single chat transcript entry. Never mutated once appended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: ChatRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    #[must_use]
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self { id: Uuid::new_v4(), role, content: content.into(), created_at: Utc::now() }
    }

    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }

    /// The fixed fallback reply for a failed exchange.
    #[must_use]
    pub fn failure() -> Self {
        Self::assistant(CHAT_ERROR_MESSAGE)
    }
}

/// An accepted outgoing message, captured when the turn begins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatTurn {
    /// Trimmed message text.
    pub message: String,
    /// Session the turn continues, if any.
    pub session_id: Option<String>,
}

/// Chat transcript plus the transients of the exchange in flight.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChatState {
    pub messages: Vec<ChatMessage>,
    pub session_id: Option<String>,
    /// True from send until completion or failure.
    pub loading: bool,
    /// Partial assistant reply accumulated from stream chunks.
    pub streaming: String,
}
