use quartz_types::ChatResponse;
use quartz_types::InitializeSessionResponse;
use quartz_types::WidgetResult;
use tui_textarea::Input;

/// Events handled by the widget controller.
#[derive(Debug)]
pub enum WidgetEvent {
    OpenRequested,
    CloseRequested,
    ToggleRequested,
    SendRequested(String),
    SessionInitialized(WidgetResult<InitializeSessionResponse>),
    ChatReplied(WidgetResult<ChatResponse>),
    CountdownRequested,
    CountdownTick(u64),
}

#[derive(Debug)]
pub enum Event {
    Widget(WidgetEvent),
    KeyboardCharInput(Input),
    KeyboardCTRLC,
    KeyboardCTRLO,
    KeyboardEnter,
    KeyboardEsc,
    KeyboardPaste(String),
    UITick,
    UIScrollDown,
    UIScrollUp,
}
