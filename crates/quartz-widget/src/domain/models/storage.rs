use anyhow::Result;
use strum_macros::Display;
use strum_macros::EnumIter;

/// Persisted entries. Names are kept compatible with the browser build of the widget.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum StorageKey {
    ChatOpen,
    SessionId,
    AgentName,
    ChatMessages,
    GptMessages,
}

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

pub type KeyValueStoreBox = Box<dyn KeyValueStore>;
