use crossterm::event::Event as CrosstermEvent;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use tui_textarea::Key;

use super::map_crossterm;
use crate::domain::models::Event;

fn key(code: KeyCode, modifiers: KeyModifiers) -> CrosstermEvent {
    return CrosstermEvent::Key(KeyEvent::new(code, modifiers));
}

#[test]
fn it_maps_widget_shortcuts() {
    assert!(matches!(
        map_crossterm(key(KeyCode::Char('o'), KeyModifiers::CONTROL)),
        Some(Event::KeyboardCTRLO)
    ));
    assert!(matches!(
        map_crossterm(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
        Some(Event::KeyboardCTRLC)
    ));
    assert!(matches!(
        map_crossterm(key(KeyCode::Enter, KeyModifiers::NONE)),
        Some(Event::KeyboardEnter)
    ));
    assert!(matches!(
        map_crossterm(key(KeyCode::Esc, KeyModifiers::NONE)),
        Some(Event::KeyboardEsc)
    ));
}

#[test]
fn it_maps_scrolling() {
    assert!(matches!(
        map_crossterm(key(KeyCode::Up, KeyModifiers::NONE)),
        Some(Event::UIScrollUp)
    ));
    assert!(matches!(
        map_crossterm(key(KeyCode::Down, KeyModifiers::NONE)),
        Some(Event::UIScrollDown)
    ));
}

#[test]
fn it_forwards_text_input() {
    match map_crossterm(key(KeyCode::Char('H'), KeyModifiers::SHIFT)) {
        Some(Event::KeyboardCharInput(input)) => {
            assert_eq!(input.key, Key::Char('H'));
            assert!(input.shift);
            assert!(!input.ctrl);
        }
        other => panic!("unexpected event: {other:?}"),
    }

    assert!(matches!(
        map_crossterm(CrosstermEvent::Paste("8 AM".to_string())),
        Some(Event::KeyboardPaste(text)) if text == "8 AM"
    ));
}

#[test]
fn it_drops_releases_and_unknown_keys() {
    let release = CrosstermEvent::Key(KeyEvent::new_with_kind(
        KeyCode::Enter,
        KeyModifiers::NONE,
        KeyEventKind::Release,
    ));
    assert!(map_crossterm(release).is_none());
    assert!(map_crossterm(key(KeyCode::F(5), KeyModifiers::NONE)).is_none());
    assert!(map_crossterm(CrosstermEvent::FocusGained).is_none());
}

#[test]
fn it_forwards_editing_keys_to_the_input() {
    match map_crossterm(key(KeyCode::Backspace, KeyModifiers::NONE)) {
        Some(Event::KeyboardCharInput(input)) => assert_eq!(input.key, Key::Backspace),
        other => panic!("unexpected event: {other:?}"),
    }
    match map_crossterm(key(KeyCode::Char('a'), KeyModifiers::CONTROL)) {
        Some(Event::KeyboardCharInput(input)) => {
            assert_eq!(input.key, Key::Char('a'));
            assert!(input.ctrl);
        }
        other => panic!("unexpected event: {other:?}"),
    }
}
