use anyhow::Context;
use smiles_viewer_rust::config::ServerConfig;
use smiles_viewer_rust::mcp::models::MCP_PATH;
use smiles_viewer_rust::router::create_app_router;
use smiles_viewer_rust::smiles::AppState;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;

    // Widget HTML is read once; every request shares it read-only
    let state = Arc::new(AppState::load(&config).await?);

    // Build application router with all routes and middleware
    let app = create_app_router(state);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!(
        "SMILES MCP server listening on http://localhost:{}{}",
        config.port, MCP_PATH
    );

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
