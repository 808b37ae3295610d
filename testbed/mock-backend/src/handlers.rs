use std::collections::HashMap;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use quartz_types::ExchangeMessage;
use quartz_types::Role;
use serde::Deserialize;
use serde_json::json;
use serde_json::Value;

use crate::fixtures::BackendFixture;
use crate::fixtures::FOLLOW_UP_QUESTIONS;

pub struct SessionRecord {
    pub agent_name: String,
    pub created_at: DateTime<Utc>,
}

/// Shared state of the mock backend.
pub struct BackendState {
    pub fixture: BackendFixture,
    pub sessions: Mutex<HashMap<u64, SessionRecord>>,
    next_id: AtomicU64,
}

impl BackendState {
    pub fn new(fixture: BackendFixture) -> Self {
        Self {
            fixture,
            sessions: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    fn session_agent(&self, session_id: u64) -> Option<String> {
        let sessions = self.sessions.lock().ok()?;
        sessions
            .get(&session_id)
            .map(|session| session.agent_name.clone())
    }
}

type HandlerError = (StatusCode, Json<Value>);

fn error(status: StatusCode, message: &str) -> HandlerError {
    (status, Json(json!({ "error": message })))
}

#[derive(Debug, Default, Deserialize)]
pub struct InitializeBody {
    #[serde(default)]
    pub agent_name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatBody {
    #[serde(default)]
    pub messages: Vec<ExchangeMessage>,
    #[serde(default)]
    pub session_id: Option<Value>,
    #[serde(default)]
    pub agent_name: String,
}

/// Session ids travel as numbers from this backend and as strings from
/// clients that stored them.
fn parse_session_id(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

pub async fn health_check(State(state): State<Arc<BackendState>>) -> impl IntoResponse {
    let sessions = state
        .sessions
        .lock()
        .map(|sessions| sessions.len())
        .unwrap_or_default();

    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "agents_count": state.fixture.agents.len(),
        "sessions": sessions
    }))
}

pub async fn initialize_session(
    State(state): State<Arc<BackendState>>,
    Json(body): Json<InitializeBody>,
) -> Result<impl IntoResponse, HandlerError> {
    if body.agent_name.trim().is_empty() {
        return Err(error(StatusCode::BAD_REQUEST, "Agent name required"));
    }

    let agent = state
        .fixture
        .get_agent(&body.agent_name)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Agent not found"))?;

    let session_id = state.next_id.fetch_add(1, Ordering::SeqCst);
    state
        .sessions
        .lock()
        .map_err(|_| error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to initialize session"))?
        .insert(
            session_id,
            SessionRecord {
                agent_name: agent.name.clone(),
                created_at: Utc::now(),
            },
        );

    tracing::info!(session_id, agent_name = %agent.name, "session initialized");

    Ok(Json(json!({
        "session_id": session_id,
        "message": "Session started successfully",
        "ai_response": BackendFixture::opening_question(agent)
    })))
}

pub async fn chat_with_ai(
    State(state): State<Arc<BackendState>>,
    Json(body): Json<ChatBody>,
) -> Result<impl IntoResponse, HandlerError> {
    let session_id = body.session_id.as_ref().and_then(parse_session_id);
    let session_id = match session_id {
        Some(session_id) if !body.messages.is_empty() => session_id,
        _ => {
            return Err(error(
                StatusCode::BAD_REQUEST,
                "No messages or session_id provided",
            ))
        }
    };

    let session_agent = state
        .session_agent(session_id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Session not found"))?;
    let agent_name = if body.agent_name.is_empty() {
        session_agent
    } else {
        body.agent_name
    };

    let answers = body
        .messages
        .iter()
        .filter(|message| message.role == Role::User)
        .map(|message| message.content.clone())
        .collect::<Vec<String>>();

    let wants_to_stop = answers
        .last()
        .map(|answer| answer.to_lowercase().contains("that's all"))
        .unwrap_or(false);

    let response = match FOLLOW_UP_QUESTIONS.get(answers.len().saturating_sub(1)) {
        Some(question) if !wants_to_stop => question.to_string(),
        _ => BackendFixture::summary(&agent_name, &answers),
    };

    tracing::info!(session_id, answers = answers.len(), "chat turn answered");

    Ok(Json(json!({ "response": response })))
}
