use std::time::Duration;

use anyhow::Result;
use quartz_client::ChatBackendArc;
use quartz_types::ChatRequest;
use quartz_types::InitializeSessionRequest;
use quartz_types::WidgetError;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time;

use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::WidgetEvent;

fn emit(event_tx: &mpsc::UnboundedSender<Event>, event: WidgetEvent) -> bool {
    if let Err(err) = event_tx.send(Event::Widget(event)) {
        tracing::debug!(error = ?err, "event receiver dropped");
        return false;
    }
    return true;
}

async fn initialize_session(
    backend: ChatBackendArc,
    request: InitializeSessionRequest,
    event_tx: mpsc::UnboundedSender<Event>,
) {
    let result = backend
        .initialize_session(request)
        .await
        .map_err(|err| WidgetError::session_start(format!("{err:#}")));

    emit(&event_tx, WidgetEvent::SessionInitialized(result));
}

async fn send_chat(
    backend: ChatBackendArc,
    request: ChatRequest,
    event_tx: mpsc::UnboundedSender<Event>,
) {
    let result = backend
        .chat(request)
        .await
        .map_err(|err| WidgetError::message_send(format!("{err:#}")));

    emit(&event_tx, WidgetEvent::ChatReplied(result));
}

async fn tick(period: Duration, generation: u64, event_tx: mpsc::UnboundedSender<Event>) {
    let mut interval = time::interval_at(time::Instant::now() + period, period);
    loop {
        interval.tick().await;
        if !emit(&event_tx, WidgetEvent::CountdownTick(generation)) {
            return;
        }
    }
}

fn replace_task(slot: &mut Option<JoinHandle<()>>, task: Option<JoinHandle<()>>) {
    if let Some(previous) = slot.take() {
        previous.abort();
    }
    *slot = task;
}

pub struct ActionsService {}

impl ActionsService {
    /// Runs actions until every sender is dropped. Network calls run on their
    /// own tasks. At most one countdown ticker and one delayed countdown
    /// start are alive at a time.
    pub async fn start(
        backend: ChatBackendArc,
        event_tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        let mut ticker: Option<JoinHandle<()>> = None;
        let mut pending_countdown: Option<JoinHandle<()>> = None;

        while let Some(action) = rx.recv().await {
            match action {
                Action::InitializeSession(request) => {
                    tokio::spawn(initialize_session(
                        backend.clone(),
                        request,
                        event_tx.clone(),
                    ));
                }
                Action::SendChat(request) => {
                    tracing::debug!(
                        session_id = %request.session_id,
                        messages = request.messages.len(),
                        "dispatching chat request"
                    );
                    tokio::spawn(send_chat(backend.clone(), request, event_tx.clone()));
                }
                Action::ScheduleCountdown(delay) => {
                    let worker_event_tx = event_tx.clone();
                    let task = tokio::spawn(async move {
                        time::sleep(delay).await;
                        emit(&worker_event_tx, WidgetEvent::CountdownRequested);
                    });
                    replace_task(&mut pending_countdown, Some(task));
                }
                Action::StartTicker(period, generation) => {
                    let task = tokio::spawn(tick(period, generation, event_tx.clone()));
                    replace_task(&mut ticker, Some(task));
                }
                Action::StopTicker => {
                    replace_task(&mut ticker, None);
                }
            }
        }

        replace_task(&mut ticker, None);
        replace_task(&mut pending_countdown, None);

        return Ok(());
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::bail;
    use async_trait::async_trait;
    use quartz_client::ChatBackend;
    use quartz_types::ChatResponse;
    use quartz_types::ExchangeMessage;
    use quartz_types::InitializeSessionResponse;
    use quartz_types::Role;
    use tokio::time::Instant;

    use super::*;

    struct ScriptedBackend {
        healthy: bool,
    }

    #[async_trait]
    impl ChatBackend for ScriptedBackend {
        async fn initialize_session(
            &self,
            request: InitializeSessionRequest,
        ) -> Result<InitializeSessionResponse> {
            if !self.healthy {
                bail!("HTTP error! status: 503");
            }
            Ok(InitializeSessionResponse {
                session_id: "abc123".to_string(),
                ai_response: format!("Hello! Tell me about {}.", request.agent_name),
                message: None,
            })
        }

        async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
            if !self.healthy {
                bail!("HTTP error! status: 500");
            }
            Ok(ChatResponse {
                response: Some(format!("{} messages received", request.messages.len())),
            })
        }

        async fn health_check(&self) -> Result<()> {
            Ok(())
        }
    }

    fn spawn_service(
        healthy: bool,
    ) -> (
        mpsc::UnboundedSender<Action>,
        mpsc::UnboundedReceiver<Event>,
    ) {
        let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();
        let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
        let backend: ChatBackendArc = Arc::new(ScriptedBackend { healthy });

        tokio::spawn(async move {
            ActionsService::start(backend, event_tx, &mut action_rx)
                .await
                .unwrap();
        });

        (action_tx, event_rx)
    }

    async fn count_ticks_until(rx: &mut mpsc::UnboundedReceiver<Event>, deadline: Instant) -> usize {
        let mut ticks = 0;
        while let Ok(Some(event)) = time::timeout_at(deadline, rx.recv()).await {
            if matches!(event, Event::Widget(WidgetEvent::CountdownTick(_))) {
                ticks += 1;
            }
        }
        ticks
    }

    #[tokio::test]
    async fn it_reports_session_start() {
        let (action_tx, mut event_rx) = spawn_service(true);

        action_tx
            .send(Action::InitializeSession(InitializeSessionRequest {
                agent_name: "Nabeel Ahmad".to_string(),
            }))
            .unwrap();

        match event_rx.recv().await.unwrap() {
            Event::Widget(WidgetEvent::SessionInitialized(Ok(response))) => {
                assert_eq!(response.session_id, "abc123");
                assert_eq!(response.ai_response, "Hello! Tell me about Nabeel Ahmad.");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn it_reports_session_start_failure() {
        let (action_tx, mut event_rx) = spawn_service(false);

        action_tx
            .send(Action::InitializeSession(InitializeSessionRequest {
                agent_name: "Nabeel Ahmad".to_string(),
            }))
            .unwrap();

        match event_rx.recv().await.unwrap() {
            Event::Widget(WidgetEvent::SessionInitialized(Err(err))) => {
                assert_eq!(
                    err,
                    WidgetError::session_start("HTTP error! status: 503")
                );
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn it_reports_chat_reply_and_failure() {
        let request = ChatRequest {
            messages: vec![
                ExchangeMessage::new(Role::Assistant, "Hello!"),
                ExchangeMessage::new(Role::User, "Hi"),
            ],
            session_id: "abc123".to_string(),
            agent_name: "Nabeel Ahmad".to_string(),
        };

        let (action_tx, mut event_rx) = spawn_service(true);
        action_tx.send(Action::SendChat(request.clone())).unwrap();
        match event_rx.recv().await.unwrap() {
            Event::Widget(WidgetEvent::ChatReplied(Ok(response))) => {
                assert_eq!(response.reply(), "2 messages received");
            }
            other => panic!("unexpected event: {other:?}"),
        }

        let (action_tx, mut event_rx) = spawn_service(false);
        action_tx.send(Action::SendChat(request)).unwrap();
        match event_rx.recv().await.unwrap() {
            Event::Widget(WidgetEvent::ChatReplied(Err(err))) => {
                assert_eq!(err.message(), "HTTP error! status: 500");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn it_requests_countdown_once_after_delay() {
        let (action_tx, mut event_rx) = spawn_service(true);
        let started = Instant::now();

        action_tx
            .send(Action::ScheduleCountdown(Duration::from_millis(1000)))
            .unwrap();
        action_tx
            .send(Action::ScheduleCountdown(Duration::from_millis(1000)))
            .unwrap();

        let event = event_rx.recv().await.unwrap();
        assert!(matches!(
            event,
            Event::Widget(WidgetEvent::CountdownRequested)
        ));
        assert!(started.elapsed() >= Duration::from_millis(1000));

        let next = time::timeout(Duration::from_secs(5), event_rx.recv()).await;
        assert!(next.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn it_ticks_every_period_until_stopped() {
        let (action_tx, mut event_rx) = spawn_service(true);
        let started = Instant::now();

        action_tx
            .send(Action::StartTicker(Duration::from_secs(1), 1))
            .unwrap();

        let ticks = count_ticks_until(&mut event_rx, started + Duration::from_millis(3500)).await;
        assert_eq!(ticks, 3);

        action_tx.send(Action::StopTicker).unwrap();
        let ticks = count_ticks_until(&mut event_rx, started + Duration::from_millis(8500)).await;
        assert_eq!(ticks, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn it_keeps_a_single_ticker() {
        let (action_tx, mut event_rx) = spawn_service(true);
        let started = Instant::now();

        action_tx
            .send(Action::StartTicker(Duration::from_secs(1), 1))
            .unwrap();
        action_tx
            .send(Action::StartTicker(Duration::from_secs(1), 1))
            .unwrap();

        let ticks = count_ticks_until(&mut event_rx, started + Duration::from_millis(5500)).await;
        assert_eq!(ticks, 5);
    }
}
