use std::io;

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::DisableBracketedPaste;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableBracketedPaste;
use crossterm::event::EnableMouseCapture;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use quartz_types::MessageKind;
use ratatui::backend::Backend;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Constraint;
use ratatui::layout::Layout;
use ratatui::layout::Margin;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Scrollbar;
use ratatui::widgets::ScrollbarOrientation;
use ratatui::Frame;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tui_textarea::TextArea;

use crate::domain::models::Event;
use crate::domain::models::WidgetEvent;
use crate::domain::services::EventsService;
use crate::domain::services::Scroll;
use crate::domain::services::ViewState;
use crate::domain::services::WidgetController;
use crate::domain::services::SYSTEM_LABEL;

#[cfg(test)]
#[path = "ui_test.rs"]
mod tests;

/// Greedy word wrap. Words longer than the width are split.
pub fn wrap_line(line: &str, width: usize) -> Vec<String> {
    if width == 0 || line.chars().count() <= width {
        return vec![line.to_string()];
    }

    let mut wrapped = vec![];
    let mut current = String::new();
    for word in line.split(' ') {
        let mut word = word.to_string();
        while word.chars().count() > width {
            if !current.is_empty() {
                wrapped.push(std::mem::take(&mut current));
            }
            wrapped.push(word.chars().take(width).collect());
            word = word.chars().skip(width).collect();
        }

        let current_len = current.chars().count();
        if current_len > 0 && current_len + 1 + word.chars().count() > width {
            wrapped.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }

    if !current.is_empty() || wrapped.is_empty() {
        wrapped.push(current);
    }

    return wrapped;
}

pub fn transcript_lines(view: &ViewState, width: usize) -> Vec<Line<'static>> {
    let mut lines = vec![];

    if let Some(placeholder) = &view.placeholder {
        let style = Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC);
        for row in wrap_line(placeholder, width) {
            lines.push(Line::styled(row, style));
        }
        return lines;
    }

    let label_style = Style::default().add_modifier(Modifier::BOLD);
    for entry in &view.entries {
        let text_style = match entry.kind {
            MessageKind::Error => Style::default().fg(Color::Red),
            MessageKind::Normal => Style::default(),
        };

        lines.push(Line::styled(format!("{}:", entry.label), label_style));
        for line in &entry.lines {
            for row in wrap_line(line, width) {
                lines.push(Line::styled(row, text_style));
            }
        }
        lines.push(Line::from(""));
    }

    if let Some(remaining) = view.countdown {
        let system_style = Style::default().fg(Color::Yellow);
        lines.push(Line::styled(
            format!("{SYSTEM_LABEL}:"),
            system_style.add_modifier(Modifier::BOLD),
        ));
        for row in wrap_line(&ViewState::countdown_notice(remaining), width) {
            lines.push(Line::styled(row, system_style));
        }
    }

    return lines;
}

fn build_textarea<'a>(enabled: bool) -> TextArea<'a> {
    let mut textarea = TextArea::default();
    textarea.set_cursor_line_style(Style::default());
    textarea.set_placeholder_text("Type your message...");
    style_textarea(&mut textarea, enabled);

    return textarea;
}

fn style_textarea(textarea: &mut TextArea, enabled: bool) {
    if enabled {
        textarea.set_block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title("Message (Enter to send)"),
        );
        textarea.set_style(Style::default());
        textarea.set_cursor_style(Style::default().add_modifier(Modifier::REVERSED));
        return;
    }

    textarea.set_block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title("Input locked"),
    );
    textarea.set_style(Style::default().fg(Color::DarkGray));
    textarea.set_cursor_style(Style::default());
}

fn draw(
    frame: &mut Frame,
    view: &ViewState,
    textarea: &TextArea,
    scroll: &mut Scroll,
    title: &str,
    jump_to_last: bool,
) {
    let area = frame.area();

    if view.toggle_visible() {
        let chunks = Layout::vertical([Constraint::Min(0), Constraint::Length(3)]).split(area);
        let toggle = Paragraph::new(format!("{title}  (Ctrl+O to open, Ctrl+C to quit)"))
            .style(Style::default().fg(Color::Cyan))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(toggle, chunks[1]);
        return;
    }

    let conversation_block = Block::default()
        .borders(Borders::ALL)
        .title(title.to_string())
        .title_bottom("Esc to close");

    // Until a session exists only the placeholder is shown, without input.
    if !view.conversation_visible {
        let inner = conversation_block.inner(area);
        let lines = transcript_lines(view, usize::from(inner.width));
        frame.render_widget(Paragraph::new(lines).block(conversation_block), area);
        return;
    }

    let chunks = Layout::vertical([Constraint::Min(3), Constraint::Length(3)]).split(area);
    let inner = conversation_block.inner(chunks[0]);

    let lines = transcript_lines(view, usize::from(inner.width.saturating_sub(1)));
    let following = scroll.is_position_at_last();
    scroll.set_state(lines.len(), usize::from(inner.height));
    if jump_to_last || following {
        scroll.last();
    }

    let position = u16::try_from(scroll.position).unwrap_or(u16::MAX);
    let conversation = Paragraph::new(lines)
        .block(conversation_block)
        .scroll((position, 0));
    frame.render_widget(conversation, chunks[0]);
    frame.render_stateful_widget(
        Scrollbar::new(ScrollbarOrientation::VerticalRight),
        chunks[0].inner(Margin {
            vertical: 1,
            horizontal: 0,
        }),
        &mut scroll.scrollbar_state,
    );
    frame.render_widget(textarea, chunks[1]);
}

pub async fn start_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    mut controller: WidgetController<ViewState>,
    resume: bool,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let mut events = EventsService::new(rx);
    let mut scroll = Scroll::default();
    let mut textarea = build_textarea(true);
    let title = format!(
        "{} · Chat with {}",
        controller.settings().assistant_label,
        controller.settings().agent_name
    );

    if resume {
        controller.resume()?;
    } else {
        controller.initialize()?;
    }

    loop {
        let input_enabled = controller.view().input_enabled;
        if controller.view_mut().take_clear_input() {
            textarea = build_textarea(input_enabled);
        }
        style_textarea(&mut textarea, input_enabled);
        let jump_to_last = controller.view_mut().take_scroll_to_bottom();

        terminal.draw(|frame| {
            draw(
                frame,
                controller.view(),
                &textarea,
                &mut scroll,
                &title,
                jump_to_last,
            )
        })?;

        let open = controller.ui_state().is_open();
        let accepts_input = open && input_enabled && controller.view().conversation_visible;
        match events.next().await? {
            Event::Widget(widget_event) => {
                controller.handle_event(widget_event)?;
            }
            Event::KeyboardCTRLC => {
                break;
            }
            Event::KeyboardCTRLO => {
                controller.handle_event(WidgetEvent::ToggleRequested)?;
            }
            Event::KeyboardEsc => {
                if open {
                    controller.handle_event(WidgetEvent::CloseRequested)?;
                }
            }
            Event::KeyboardEnter => {
                if accepts_input {
                    let text = textarea.lines().join("\n");
                    controller.handle_event(WidgetEvent::SendRequested(text))?;
                }
            }
            Event::KeyboardCharInput(input) => {
                if accepts_input {
                    textarea.input(input);
                }
            }
            Event::KeyboardPaste(text) => {
                if accepts_input {
                    textarea.insert_str(text);
                }
            }
            Event::UIScrollUp => {
                scroll.up();
            }
            Event::UIScrollDown => {
                scroll.down();
            }
            Event::UITick => {}
        }
    }

    tracing::info!("widget host exiting");
    return Ok(());
}

/// Takes over the terminal, runs the widget until Ctrl+C and hands the terminal back.
pub async fn run(
    controller: WidgetController<ViewState>,
    resume: bool,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    enable_raw_mode()?;
    crossterm::execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;

    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;

    let result = start_loop(&mut terminal, controller, resume, rx).await;

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    let _ = crossterm::execute!(io::stdout(), cursor::Show);

    return result;
}

pub fn destruct_terminal_for_panic() {
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste,
        cursor::Show
    );
}
