use anyhow::{bail, Result};
use async_trait::async_trait;
use quartz_types::{ChatRequest, ChatResponse, InitializeSessionRequest, InitializeSessionResponse};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::ChatBackend;

/// HTTP client for communicating with a remote chat backend
pub struct HttpChatBackend {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpChatBackend {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn post_json<Req, Res>(&self, route: &str, payload: &Req) -> Result<Res>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, route);
        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .timeout(self.timeout)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            tracing::error!(status = status.as_u16(), body = %body, route, "backend request failed");
            bail!("HTTP error! status: {}", status.as_u16());
        }

        Ok(response.json::<Res>().await?)
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn initialize_session(
        &self,
        request: InitializeSessionRequest,
    ) -> Result<InitializeSessionResponse> {
        tracing::debug!(agent_name = %request.agent_name, "initializing session");
        self.post_json("/initialize_session", &request).await
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        tracing::debug!(
            session_id = %request.session_id,
            messages = request.messages.len(),
            "sending chat turn"
        );
        self.post_json("/chat_with_ai", &request).await
    }

    async fn health_check(&self) -> Result<()> {
        let health_url = format!("{}/health", self.base_url);
        let response = self
            .client
            .get(&health_url)
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            bail!("Health check failed: {}", response.status());
        }

        Ok(())
    }
}
