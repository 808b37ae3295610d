//! Error types surfaced by the chat widget.

use thiserror::Error;

/// The two failure kinds a user can see in the widget.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WidgetError {
    /// Session creation failed or the backend answered with a non-success status.
    #[error("Session start failed: {message}")]
    SessionStartFailure { message: String },

    /// A chat turn failed on the network or with a non-success status.
    #[error("Message send failed: {message}")]
    MessageSendFailure { message: String },
}

impl WidgetError {
    /// Create a new session start failure.
    pub fn session_start(message: impl Into<String>) -> Self {
        Self::SessionStartFailure {
            message: message.into(),
        }
    }

    /// Create a new message send failure.
    pub fn message_send(message: impl Into<String>) -> Self {
        Self::MessageSendFailure {
            message: message.into(),
        }
    }

    /// The underlying cause, without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::SessionStartFailure { message } | Self::MessageSendFailure { message } => {
                message
            }
        }
    }
}

/// Result type for widget backend operations.
pub type WidgetResult<T> = Result<T, WidgetError>;
