//! Embeddable chat widget for the Quartz AI backend.
//!
//! The [`WidgetController`] owns a conversation with one backend session: it
//! starts the session, relays messages, persists the transcript through a
//! key-value store and closes itself with a countdown once the backend
//! concludes the conversation. Rendering is delegated to a [`WidgetView`]; the
//! bundled terminal host draws a [`ViewState`] with ratatui.

pub mod application;
pub mod configuration;
pub mod domain;
pub mod infrastructure;
pub use application::ui::{destruct_terminal_for_panic, start_loop};
pub use configuration::{Config, ConfigKey};
pub use domain::models::{
    Action, Event, KeyValueStore, Message, WidgetEvent, WidgetSettings, WidgetUiState, WidgetView,
};
pub use domain::services::{ActionsService, ViewState, WidgetController, WidgetControllerProps};
pub use infrastructure::storage::{FileStore, MemoryStore, StoreManager};
