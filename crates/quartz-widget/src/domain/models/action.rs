use std::time::Duration;

use quartz_types::ChatRequest;
use quartz_types::InitializeSessionRequest;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    InitializeSession(InitializeSessionRequest),
    SendChat(ChatRequest),
    ScheduleCountdown(Duration),
    /// Every tick echoes the generation back.
    StartTicker(Duration, u64),
    StopTicker,
}
