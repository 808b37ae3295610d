use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::fixtures::BackendFixture;
use crate::handlers::chat_with_ai;
use crate::handlers::health_check;
use crate::handlers::initialize_session;
use crate::handlers::BackendState;

pub struct MockServer {
    state: Arc<BackendState>,
}

impl MockServer {
    pub fn new() -> Self {
        Self::with_fixture(BackendFixture::create_test_fixture())
    }

    pub fn with_fixture(fixture: BackendFixture) -> Self {
        Self {
            state: Arc::new(BackendState::new(fixture)),
        }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(health_check))
            .route("/initialize_session", post(initialize_session))
            .route("/chat_with_ai", post(chat_with_ai))
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    pub async fn serve(self, addr: &str) -> anyhow::Result<()> {
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Starting Quartz mock backend on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .await
            .map_err(|e| anyhow::anyhow!("Mock backend error: {}", e))?;

        Ok(())
    }

    /// Binds an ephemeral port and serves in the background.
    pub async fn spawn(self) -> anyhow::Result<(SocketAddr, JoinHandle<()>)> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let app = self.router();

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("Mock backend error: {}", e);
            }
        });

        Ok((addr, handle))
    }

    pub fn get_state(&self) -> Arc<BackendState> {
        self.state.clone()
    }
}

impl Default for MockServer {
    fn default() -> Self {
        Self::new()
    }
}
