//! Client SDK for the Quartz chat backend.
//!
//! The widget talks to the backend through the [`ChatBackend`] trait so that the
//! controller and its services can be exercised against scripted backends in tests,
//! while production builds use the reqwest-based [`http_client::HttpChatBackend`].

use anyhow::Result;
use async_trait::async_trait;
use quartz_types::{ChatRequest, ChatResponse, InitializeSessionRequest, InitializeSessionResponse};
use std::sync::Arc;
use std::time::Duration;

pub mod http_client;

pub use http_client::HttpChatBackend;

/// ChatBackend trait for the two endpoints the widget consumes
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Open a new session for the given agent and receive its greeting
    async fn initialize_session(
        &self,
        request: InitializeSessionRequest,
    ) -> Result<InitializeSessionResponse>;

    /// Send the full exchange so far and receive the next assistant reply
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> Result<()>;
}

pub type ChatBackendArc = Arc<dyn ChatBackend>;

/// Factory for creating ChatBackend instances
pub struct ChatBackendFactory;

impl ChatBackendFactory {
    /// Create an HTTP backend for a remote server
    pub fn create_http_backend(base_url: String, timeout: Duration) -> ChatBackendArc {
        Arc::new(HttpChatBackend::new(base_url).with_timeout(timeout))
    }
}
