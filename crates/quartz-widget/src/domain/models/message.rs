#[cfg(test)]
#[path = "message_test.rs"]
mod tests;

use quartz_types::ExchangeMessage;
use quartz_types::MessageKind;
use quartz_types::Role;
use quartz_types::StoredMessage;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Message {
    pub role: Role,
    pub text: String,
    pub kind: MessageKind,
}

impl Message {
    pub fn new(role: Role, text: &str) -> Message {
        return Message {
            role,
            text: text.to_string(),
            kind: MessageKind::Normal,
        };
    }

    pub fn new_with_kind(role: Role, kind: MessageKind, text: &str) -> Message {
        return Message {
            role,
            text: text.to_string(),
            kind,
        };
    }

    /// Error notices stay on screen but are never replayed to the backend.
    pub fn is_exchanged(&self) -> bool {
        return self.kind == MessageKind::Normal;
    }

    pub fn to_exchange(&self) -> ExchangeMessage {
        return ExchangeMessage::new(self.role, self.text.clone());
    }

    pub fn to_stored(&self) -> StoredMessage {
        return StoredMessage {
            role: self.role,
            text: self.text.clone(),
            kind: self.kind,
        };
    }

    /// Display lines, with tabs expanded for the terminal.
    pub fn lines(&self) -> Vec<String> {
        return self
            .text
            .replace('\t', "  ")
            .split('\n')
            .map(|line| line.to_string())
            .collect();
    }
}

impl From<StoredMessage> for Message {
    fn from(stored: StoredMessage) -> Message {
        return Message {
            role: stored.role,
            text: stored.text,
            kind: stored.kind,
        };
    }
}

impl From<ExchangeMessage> for Message {
    fn from(exchanged: ExchangeMessage) -> Message {
        return Message::new(exchanged.role, &exchanged.content);
    }
}

/// The exact payload history for the next turn.
pub fn exchange_history(messages: &[Message]) -> Vec<ExchangeMessage> {
    return messages
        .iter()
        .filter(|message| message.is_exchanged())
        .map(Message::to_exchange)
        .collect();
}
