use anyhow::Result;
use crossterm::event::Event as CrosstermEvent;
use crossterm::event::EventStream;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use crossterm::event::MouseEventKind;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time;
use tui_textarea::Input;
use tui_textarea::Key;

use crate::domain::models::Event;

#[cfg(test)]
#[path = "events_test.rs"]
mod tests;

pub struct EventsService {
    crossterm_events: EventStream,
    events: mpsc::UnboundedReceiver<Event>,
}

/// Maps a terminal event onto a host event. Unknown keys and key releases are dropped.
pub fn map_crossterm(event: CrosstermEvent) -> Option<Event> {
    return match event {
        CrosstermEvent::Key(key_event) if key_event.kind != KeyEventKind::Release => {
            map_key(key_event)
        }
        CrosstermEvent::Mouse(mouse_event) => match mouse_event.kind {
            MouseEventKind::ScrollUp => Some(Event::UIScrollUp),
            MouseEventKind::ScrollDown => Some(Event::UIScrollDown),
            _ => None,
        },
        CrosstermEvent::Paste(text) => Some(Event::KeyboardPaste(text)),
        _ => None,
    };
}

/// Widget shortcuts first. Whatever is left edits the message input.
fn map_key(key_event: KeyEvent) -> Option<Event> {
    let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
    match key_event.code {
        KeyCode::Char('o') if ctrl => return Some(Event::KeyboardCTRLO),
        KeyCode::Char('c') if ctrl => return Some(Event::KeyboardCTRLC),
        KeyCode::Enter => return Some(Event::KeyboardEnter),
        KeyCode::Esc => return Some(Event::KeyboardEsc),
        KeyCode::Up => return Some(Event::UIScrollUp),
        KeyCode::Down => return Some(Event::UIScrollDown),
        _ => {}
    }

    let key = match key_event.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        _ => return None,
    };

    return Some(Event::KeyboardCharInput(Input {
        key,
        ctrl,
        alt: key_event.modifiers.contains(KeyModifiers::ALT),
        shift: key_event.modifiers.contains(KeyModifiers::SHIFT),
    }));
}

impl EventsService {
    pub fn new(events: mpsc::UnboundedReceiver<Event>) -> EventsService {
        return EventsService {
            crossterm_events: EventStream::new(),
            events,
        };
    }

    pub async fn next(&mut self) -> Result<Event> {
        loop {
            let evt = tokio::select! {
                event = self.events.recv() => event,
                event = self.crossterm_events.next() => match event {
                    Some(Ok(input)) => map_crossterm(input),
                    Some(Err(_)) => None,
                    None => None
                },
                _ = time::sleep(time::Duration::from_millis(500)) => Some(Event::UITick)
            };

            if let Some(event) = evt {
                return Ok(event);
            }
        }
    }
}
