use super::Message;

/// Rendering primitives the controller delegates to.
pub trait WidgetView {
    /// Open shows the chat window and hides the toggle button, closed does the reverse.
    fn set_widget_open(&mut self, open: bool);
    fn set_conversation_visible(&mut self, visible: bool);
    /// Replaces the whole conversation area with a static line of text.
    fn show_placeholder(&mut self, text: &str);
    fn clear_conversation(&mut self);
    fn append_message(&mut self, label: &str, message: &Message);
    /// Shows the closing notice, or updates it when already shown.
    fn show_countdown(&mut self, remaining: u32);
    fn clear_countdown(&mut self);
    fn set_input_enabled(&mut self, enabled: bool);
    fn clear_input(&mut self);
    fn scroll_to_bottom(&mut self);
}
