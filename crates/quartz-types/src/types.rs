//! Core types for the chat backend contract.

use serde::{Deserialize, Deserializer, Serialize};

/// Substrings in an assistant reply that mean the conversation has concluded.
pub const COMPLETION_MARKERS: [&str; 2] = ["CONVERSATION SUMMARY:", "Thank you for providing"];

/// Returns true when a reply carries one of the [`COMPLETION_MARKERS`].
pub fn contains_completion_marker(reply: &str) -> bool {
    COMPLETION_MARKERS
        .iter()
        .any(|marker| reply.contains(marker))
}

/// Message roles in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A turn typed by the person using the widget.
    User,
    /// A turn produced by the backend.
    Assistant,
}

/// Whether a message is part of the exchange or a locally generated notice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Exchanged with the backend.
    #[default]
    Normal,
    /// Rendered and stored, but never sent to the backend.
    Error,
}

impl MessageKind {
    fn is_normal(&self) -> bool {
        *self == MessageKind::Normal
    }
}

/// A message as it travels to the backend, and as it is stored under the
/// exchange history key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeMessage {
    /// Who authored the turn.
    pub role: Role,
    /// The turn text.
    pub content: String,
}

impl ExchangeMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// A message as stored under the rendered history key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMessage {
    /// Who authored the turn.
    pub role: Role,
    /// The rendered text.
    pub text: String,
    /// Absent in records written by older clients, which only stored exchanged turns.
    #[serde(default, skip_serializing_if = "MessageKind::is_normal")]
    pub kind: MessageKind,
}

/// Body of `POST /initialize_session`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitializeSessionRequest {
    /// The agent the conversation is about.
    pub agent_name: String,
}

/// Response of `POST /initialize_session`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitializeSessionResponse {
    /// Opaque session identifier. Some backends issue integer ids, which are
    /// kept in their decimal string form.
    #[serde(deserialize_with = "string_or_number")]
    pub session_id: String,
    /// The greeting that opens the conversation.
    pub ai_response: String,
    /// Informational status line (optional).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Body of `POST /chat_with_ai`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The full exchange so far, oldest first, ending with the new user turn.
    pub messages: Vec<ExchangeMessage>,
    /// The session the turn belongs to.
    pub session_id: String,
    /// The agent the conversation is about.
    pub agent_name: String,
}

/// Response of `POST /chat_with_ai`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The assistant reply (optional, some failures answer with an empty body).
    #[serde(default)]
    pub response: Option<String>,
}

impl ChatResponse {
    pub const EMPTY_REPLY: &'static str = "No response received.";

    /// The reply text, falling back to a fixed notice when the backend sent none.
    pub fn reply(&self) -> String {
        match self.response.as_deref() {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => Self::EMPTY_REPLY.to_string(),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(text) => text,
        Id::Number(number) => number.to_string(),
    })
}
