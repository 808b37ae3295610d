#[cfg(test)]
#[path = "persistence_test.rs"]
mod tests;

use quartz_types::ExchangeMessage;
use quartz_types::StoredMessage;
use strum::IntoEnumIterator;

use crate::domain::models::exchange_history;
use crate::domain::models::KeyValueStoreBox;
use crate::domain::models::Message;
use crate::domain::models::StorageKey;

/// Write-through cache of the widget state. In-memory state stays canonical,
/// so storage failures are logged and never interrupt the conversation.
pub struct WidgetStorage {
    store: KeyValueStoreBox,
}

impl WidgetStorage {
    pub fn new(store: KeyValueStoreBox) -> WidgetStorage {
        return WidgetStorage { store };
    }

    pub fn clear(&self) {
        for key in StorageKey::iter() {
            if let Err(err) = self.store.remove(&key.to_string()) {
                tracing::warn!(key = %key, error = ?err, "failed to remove stored entry");
            }
        }
    }

    pub fn save_open(&self, open: bool) {
        self.write(StorageKey::ChatOpen, if open { "true" } else { "false" });
    }

    pub fn is_open(&self) -> bool {
        return self.read(StorageKey::ChatOpen).as_deref() == Some("true");
    }

    pub fn save_session(&self, session_id: &str, agent_name: &str) {
        self.write(StorageKey::SessionId, session_id);
        self.write(StorageKey::AgentName, agent_name);
    }

    pub fn session_id(&self) -> Option<String> {
        return self.read(StorageKey::SessionId).filter(|id| !id.is_empty());
    }

    pub fn agent_name(&self) -> Option<String> {
        return self.read(StorageKey::AgentName);
    }

    /// Writes both the rendered and the exchange history from one message list.
    pub fn save_history(&self, messages: &[Message]) {
        let rendered = messages
            .iter()
            .map(Message::to_stored)
            .collect::<Vec<StoredMessage>>();
        let exchanged = exchange_history(messages);

        match serde_json::to_string(&rendered) {
            Ok(json) => self.write(StorageKey::ChatMessages, &json),
            Err(err) => tracing::error!(error = ?err, "failed to serialize rendered history"),
        }
        match serde_json::to_string(&exchanged) {
            Ok(json) => self.write(StorageKey::GptMessages, &json),
            Err(err) => tracing::error!(error = ?err, "failed to serialize exchange history"),
        }
    }

    /// Rendered history is canonical. The exchange history is only consulted
    /// when the rendered one is missing.
    pub fn load_history(&self) -> Vec<Message> {
        if let Some(json) = self.read(StorageKey::ChatMessages) {
            return match serde_json::from_str::<Vec<StoredMessage>>(&json) {
                Ok(stored) => stored.into_iter().map(Message::from).collect(),
                Err(err) => {
                    tracing::warn!(error = ?err, "discarding malformed rendered history");
                    vec![]
                }
            };
        }

        if let Some(json) = self.read(StorageKey::GptMessages) {
            return match serde_json::from_str::<Vec<ExchangeMessage>>(&json) {
                Ok(exchanged) => exchanged.into_iter().map(Message::from).collect(),
                Err(err) => {
                    tracing::warn!(error = ?err, "discarding malformed exchange history");
                    vec![]
                }
            };
        }

        return vec![];
    }

    fn read(&self, key: StorageKey) -> Option<String> {
        match self.store.get(&key.to_string()) {
            Ok(value) => return value,
            Err(err) => {
                tracing::warn!(key = %key, error = ?err, "failed to read stored entry");
                return None;
            }
        }
    }

    fn write(&self, key: StorageKey, value: &str) {
        if let Err(err) = self.store.set(&key.to_string(), value) {
            tracing::error!(key = %key, error = ?err, "failed to persist entry");
        }
    }
}
