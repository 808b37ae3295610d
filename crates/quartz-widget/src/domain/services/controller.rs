use std::time::Duration;

use anyhow::Result;
use quartz_types::contains_completion_marker;
use quartz_types::ChatRequest;
use quartz_types::ChatResponse;
use quartz_types::InitializeSessionRequest;
use quartz_types::InitializeSessionResponse;
use quartz_types::MessageKind;
use quartz_types::Role;
use quartz_types::WidgetResult;
use tokio::sync::mpsc;

use super::WidgetStorage;
use crate::domain::models::exchange_history;
use crate::domain::models::Action;
use crate::domain::models::KeyValueStoreBox;
use crate::domain::models::Message;
use crate::domain::models::WidgetEvent;
use crate::domain::models::WidgetSettings;
use crate::domain::models::WidgetUiState;
use crate::domain::models::WidgetView;

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;

pub const SEND_ERROR_TEXT: &str = "⚠️ Error communicating with backend.";

const TICK_PERIOD: Duration = Duration::from_secs(1);

pub struct WidgetControllerProps<V: WidgetView> {
    pub settings: WidgetSettings,
    pub store: KeyValueStoreBox,
    pub view: V,
    pub action_tx: mpsc::UnboundedSender<Action>,
}

/// Owns the session, the conversation and the widget's visual state. Network
/// calls and timers are requested through actions, and their outcomes come
/// back through [`WidgetController::handle_event`].
pub struct WidgetController<V: WidgetView> {
    settings: WidgetSettings,
    storage: WidgetStorage,
    view: V,
    action_tx: mpsc::UnboundedSender<Action>,
    session_id: Option<String>,
    session_pending: bool,
    messages: Vec<Message>,
    ui_state: WidgetUiState,
    countdown: Option<u32>,
    countdown_generation: u64,
}

impl<V: WidgetView> WidgetController<V> {
    pub fn new(props: WidgetControllerProps<V>) -> WidgetController<V> {
        return WidgetController {
            settings: props.settings,
            storage: WidgetStorage::new(props.store),
            view: props.view,
            action_tx: props.action_tx,
            session_id: None,
            session_pending: false,
            messages: vec![],
            ui_state: WidgetUiState::Closed,
            countdown: None,
            countdown_generation: 0,
        };
    }

    pub fn settings(&self) -> &WidgetSettings {
        return &self.settings;
    }

    pub fn session_id(&self) -> Option<&str> {
        return self.session_id.as_deref();
    }

    pub fn messages(&self) -> &[Message] {
        return &self.messages;
    }

    pub fn ui_state(&self) -> WidgetUiState {
        return self.ui_state;
    }

    pub fn countdown_remaining(&self) -> Option<u32> {
        return self.countdown;
    }

    /// Input is locked exactly while a closing countdown runs.
    pub fn is_input_locked(&self) -> bool {
        return self.countdown.is_some();
    }

    pub fn view(&self) -> &V {
        return &self.view;
    }

    pub fn view_mut(&mut self) -> &mut V {
        return &mut self.view;
    }

    pub fn handle_event(&mut self, event: WidgetEvent) -> Result<()> {
        match event {
            WidgetEvent::OpenRequested => self.open_widget(),
            WidgetEvent::CloseRequested => {
                self.close_widget();
                Ok(())
            }
            WidgetEvent::ToggleRequested => {
                if self.ui_state.is_open() {
                    self.close_widget();
                    return Ok(());
                }
                self.open_widget()
            }
            WidgetEvent::SendRequested(text) => self.send_message(&text),
            WidgetEvent::SessionInitialized(result) => {
                self.handle_session_initialized(result);
                Ok(())
            }
            WidgetEvent::ChatReplied(result) => self.handle_chat_reply(result),
            WidgetEvent::CountdownRequested => self.start_closing_countdown(),
            WidgetEvent::CountdownTick(generation) => self.handle_countdown_tick(generation),
        }
    }

    /// Wipes everything persisted by a previous run, then starts a fresh session.
    pub fn initialize(&mut self) -> Result<()> {
        tracing::info!(agent_name = %self.settings.agent_name, "initializing chat widget");
        self.storage.clear();
        self.reset_ui();
        return self.start_session();
    }

    /// Keeps what a previous run persisted and reopens the widget if it was left open.
    pub fn resume(&mut self) -> Result<()> {
        tracing::info!(agent_name = %self.settings.agent_name, "resuming chat widget");
        self.reset_ui();
        if self.storage.is_open() {
            return self.open_widget();
        }

        return Ok(());
    }

    fn reset_ui(&mut self) {
        self.clear_countdown();
        self.ui_state = WidgetUiState::Closed;
        self.view.set_widget_open(false);
        self.view.set_conversation_visible(false);
        self.view.set_input_enabled(true);
        self.view.show_placeholder(&format!(
            "Starting chat with {}...",
            self.settings.agent_name
        ));
        self.messages.clear();
        self.session_id = None;
        self.session_pending = false;
    }

    pub fn start_session(&mut self) -> Result<()> {
        tracing::info!(agent_name = %self.settings.agent_name, "starting session");
        self.session_pending = true;
        self.action_tx
            .send(Action::InitializeSession(InitializeSessionRequest {
                agent_name: self.settings.agent_name.clone(),
            }))?;

        return Ok(());
    }

    pub fn handle_session_initialized(&mut self, result: WidgetResult<InitializeSessionResponse>) {
        self.session_pending = false;

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(error = %err, "failed to start chat");
                self.view.show_placeholder(&format!(
                    "Error starting chat with {}. Please check backend connection.",
                    self.settings.agent_name
                ));
                return;
            }
        };

        tracing::info!(session_id = %response.session_id, "session created");
        self.session_id = Some(response.session_id.clone());
        self.view.set_conversation_visible(true);
        self.view.clear_conversation();

        let greeting = Message::new(Role::Assistant, &response.ai_response);
        self.messages = vec![];
        self.push_message(greeting);

        self.storage
            .save_session(&response.session_id, &self.settings.agent_name);

        if self.countdown.is_some() {
            self.render_countdown();
        }
    }

    pub fn send_message(&mut self, text: &str) -> Result<()> {
        let text = text.trim();
        let session_id = match self.session_id.clone() {
            Some(session_id) if !text.is_empty() => session_id,
            _ => {
                tracing::debug!(
                    empty = text.is_empty(),
                    has_session = self.session_id.is_some(),
                    "cannot send, no text or session"
                );
                return Ok(());
            }
        };
        if self.is_input_locked() {
            tracing::debug!("cannot send while the closing countdown runs");
            return Ok(());
        }

        tracing::info!(session_id = %session_id, "sending message");
        self.push_message(Message::new(Role::User, text));
        self.view.clear_input();

        self.action_tx.send(Action::SendChat(ChatRequest {
            messages: exchange_history(&self.messages),
            session_id,
            agent_name: self.settings.agent_name.clone(),
        }))?;

        return Ok(());
    }

    pub fn handle_chat_reply(&mut self, result: WidgetResult<ChatResponse>) -> Result<()> {
        let response = match result {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(error = %err, "error sending message");
                self.push_message(Message::new_with_kind(
                    Role::Assistant,
                    MessageKind::Error,
                    SEND_ERROR_TEXT,
                ));
                return Ok(());
            }
        };

        let reply = response.reply();
        tracing::debug!(length = reply.len(), "received reply");
        let concluded = contains_completion_marker(&reply);
        self.push_message(Message::new(Role::Assistant, &reply));

        if concluded {
            tracing::info!("conversation concluded, scheduling closing countdown");
            self.action_tx
                .send(Action::ScheduleCountdown(self.settings.completion_delay))?;
        }

        return Ok(());
    }

    pub fn open_widget(&mut self) -> Result<()> {
        tracing::info!("opening chat widget");
        self.ui_state = WidgetUiState::Open;
        self.view.set_widget_open(true);
        self.storage.save_open(true);

        return self.restore();
    }

    pub fn close_widget(&mut self) {
        tracing::info!("closing chat widget");
        self.clear_countdown();
        self.ui_state = WidgetUiState::Closed;
        self.view.set_widget_open(false);
        self.storage.save_open(false);
        self.view.set_input_enabled(true);
    }

    /// Re-renders the current session, reading it back from storage when this
    /// instance holds none, or starts a new session when storage has none either.
    pub fn restore(&mut self) -> Result<()> {
        if self.session_id.is_none() {
            if let Some(session_id) = self.storage.session_id() {
                tracing::info!(
                    session_id = %session_id,
                    agent_name = ?self.storage.agent_name(),
                    "session restored"
                );
                self.session_id = Some(session_id);
                self.messages = self.storage.load_history();
            }
        }

        if self.session_id.is_none() {
            if self.session_pending {
                tracing::debug!("session start already in flight");
            } else {
                tracing::info!("no session found, auto-starting");
                self.start_session()?;
            }
            self.view.scroll_to_bottom();
            return Ok(());
        }

        self.view.set_conversation_visible(true);
        if !self.messages.is_empty() {
            self.view.clear_conversation();
            for message in &self.messages {
                self.view
                    .append_message(self.settings.label(message.role), message);
            }
            tracing::debug!(count = self.messages.len(), "messages restored");
        }
        if self.countdown.is_some() {
            self.render_countdown();
        }
        self.view.scroll_to_bottom();

        return Ok(());
    }

    /// Replaces any running countdown with a fresh one and locks input until it ends.
    pub fn start_closing_countdown(&mut self) -> Result<()> {
        self.clear_countdown();

        let seconds = self.settings.countdown_seconds;
        if seconds == 0 {
            self.close_widget();
            return Ok(());
        }

        self.countdown_generation = self.countdown_generation.wrapping_add(1);
        tracing::info!(
            seconds,
            generation = self.countdown_generation,
            "starting closing countdown"
        );
        self.countdown = Some(seconds);
        self.render_countdown();
        self.view.scroll_to_bottom();
        self.view.set_input_enabled(false);
        self.action_tx
            .send(Action::StartTicker(TICK_PERIOD, self.countdown_generation))?;

        return Ok(());
    }

    /// Ticks from a ticker that was stopped or replaced may still be queued;
    /// only the current generation counts.
    pub fn handle_countdown_tick(&mut self, generation: u64) -> Result<()> {
        let remaining = match self.countdown {
            Some(remaining) if generation == self.countdown_generation => {
                remaining.saturating_sub(1)
            }
            _ => {
                tracing::debug!(generation, "ignoring stale countdown tick");
                return Ok(());
            }
        };

        self.countdown = Some(remaining);
        self.render_countdown();

        if remaining == 0 {
            self.close_widget();
        }

        return Ok(());
    }

    fn clear_countdown(&mut self) {
        if self.countdown.take().is_some() {
            if let Err(err) = self.action_tx.send(Action::StopTicker) {
                tracing::error!(error = ?err, "failed to stop countdown ticker");
            }
        }
        self.view.clear_countdown();
    }

    fn render_countdown(&mut self) {
        if let Some(remaining) = self.countdown {
            self.view.show_countdown(remaining);
        }
    }

    fn push_message(&mut self, message: Message) {
        self.view
            .append_message(self.settings.label(message.role), &message);
        self.messages.push(message);
        self.storage.save_history(&self.messages);
    }
}
