use std::time::Duration;

use quartz_types::Role;
use strum_macros::Display;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum WidgetUiState {
    #[default]
    Closed,
    Open,
}

impl WidgetUiState {
    pub fn is_open(&self) -> bool {
        return *self == WidgetUiState::Open;
    }
}

/// Everything the controller needs to know about its deployment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WidgetSettings {
    pub agent_name: String,
    pub user_label: String,
    pub assistant_label: String,
    pub countdown_seconds: u32,
    pub completion_delay: Duration,
}

impl Default for WidgetSettings {
    fn default() -> WidgetSettings {
        return WidgetSettings {
            agent_name: "Nabeel Ahmad".to_string(),
            user_label: "AGENT".to_string(),
            assistant_label: "QUARTZ AI".to_string(),
            countdown_seconds: 20,
            completion_delay: Duration::from_millis(1000),
        };
    }
}

impl WidgetSettings {
    pub fn label(&self, role: Role) -> &str {
        match role {
            Role::User => &self.user_label,
            Role::Assistant => &self.assistant_label,
        }
    }
}
