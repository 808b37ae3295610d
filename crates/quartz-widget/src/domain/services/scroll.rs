use ratatui::widgets::ScrollbarState;

#[cfg(test)]
#[path = "scroll_test.rs"]
mod tests;

#[derive(Default)]
pub struct Scroll {
    list_length: usize,
    viewport_length: usize,
    pub position: usize,
    pub scrollbar_state: ScrollbarState,
}

impl Scroll {
    fn max_position(&self) -> usize {
        return self.list_length.saturating_sub(self.viewport_length);
    }

    pub fn up(&mut self) {
        self.position = self.position.saturating_sub(1);
        self.scrollbar_state = self.scrollbar_state.position(self.position);
    }

    pub fn down(&mut self) {
        self.position = (self.position + 1).min(self.max_position());
        self.scrollbar_state = self.scrollbar_state.position(self.position);
    }

    pub fn last(&mut self) {
        self.position = self.max_position();
        self.scrollbar_state = self.scrollbar_state.position(self.position);
    }

    pub fn is_position_at_last(&self) -> bool {
        return self.position >= self.max_position();
    }

    pub fn set_state(&mut self, list_length: usize, viewport_length: usize) {
        self.list_length = list_length;
        self.viewport_length = viewport_length;
        self.position = self.position.min(self.max_position());
        self.scrollbar_state = self
            .scrollbar_state
            .content_length(self.max_position())
            .viewport_content_length(viewport_length)
            .position(self.position);
    }
}
