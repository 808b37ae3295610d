use quartz_mock_backend::MockServer;
use std::env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let addr = env::var("MOCK_BACKEND_ADDR").unwrap_or_else(|_| "127.0.0.1:5000".to_string());

    tracing::info!("Starting Quartz mock backend on {}", addr);
    MockServer::new().serve(&addr).await?;

    Ok(())
}
