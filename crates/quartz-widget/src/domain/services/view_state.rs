#[cfg(test)]
#[path = "view_state_test.rs"]
mod tests;

use quartz_types::MessageKind;

use crate::domain::models::Message;
use crate::domain::models::WidgetView;

pub const SYSTEM_LABEL: &str = "SYSTEM";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewEntry {
    pub label: String,
    pub lines: Vec<String>,
    pub kind: MessageKind,
}

/// Retained view of the widget, drawn by the terminal host each frame.
#[derive(Clone, Debug)]
pub struct ViewState {
    pub widget_open: bool,
    pub conversation_visible: bool,
    pub placeholder: Option<String>,
    pub entries: Vec<ViewEntry>,
    pub countdown: Option<u32>,
    pub input_enabled: bool,
    clear_input_requested: bool,
    scroll_to_bottom_requested: bool,
}

impl Default for ViewState {
    fn default() -> ViewState {
        return ViewState {
            widget_open: false,
            conversation_visible: false,
            placeholder: Some("Chat will appear here once started.".to_string()),
            entries: vec![],
            countdown: None,
            input_enabled: true,
            clear_input_requested: false,
            scroll_to_bottom_requested: false,
        };
    }
}

impl ViewState {
    pub fn toggle_visible(&self) -> bool {
        return !self.widget_open;
    }

    pub fn countdown_notice(remaining: u32) -> String {
        return format!("Chat will close automatically in {remaining} seconds...");
    }

    /// Returns true once per clear request.
    pub fn take_clear_input(&mut self) -> bool {
        return std::mem::take(&mut self.clear_input_requested);
    }

    /// Returns true once per scroll request.
    pub fn take_scroll_to_bottom(&mut self) -> bool {
        return std::mem::take(&mut self.scroll_to_bottom_requested);
    }

    /// Plain text rendition of the conversation area.
    pub fn transcript(&self) -> String {
        if let Some(placeholder) = &self.placeholder {
            return placeholder.to_string();
        }

        let mut blocks = self
            .entries
            .iter()
            .map(|entry| format!("{}:\n{}", entry.label, entry.lines.join("\n")))
            .collect::<Vec<String>>();

        if let Some(remaining) = self.countdown {
            blocks.push(format!(
                "{SYSTEM_LABEL}:\n{}",
                ViewState::countdown_notice(remaining)
            ));
        }

        return blocks.join("\n\n");
    }
}

impl WidgetView for ViewState {
    fn set_widget_open(&mut self, open: bool) {
        self.widget_open = open;
    }

    fn set_conversation_visible(&mut self, visible: bool) {
        self.conversation_visible = visible;
    }

    fn show_placeholder(&mut self, text: &str) {
        self.entries.clear();
        self.countdown = None;
        self.placeholder = Some(text.to_string());
    }

    fn clear_conversation(&mut self) {
        self.entries.clear();
        self.countdown = None;
        self.placeholder = None;
    }

    fn append_message(&mut self, label: &str, message: &Message) {
        self.placeholder = None;
        self.entries.push(ViewEntry {
            label: label.to_string(),
            lines: message.lines(),
            kind: message.kind,
        });
        self.scroll_to_bottom_requested = true;
    }

    fn show_countdown(&mut self, remaining: u32) {
        self.placeholder = None;
        self.countdown = Some(remaining);
    }

    fn clear_countdown(&mut self) {
        self.countdown = None;
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        self.input_enabled = enabled;
    }

    fn clear_input(&mut self) {
        self.clear_input_requested = true;
    }

    fn scroll_to_bottom(&mut self) {
        self.scroll_to_bottom_requested = true;
    }
}
