use std::sync::Arc;

use anyhow::Context;
use medassist_backend::{config::Config, routes, state::AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG may come from .env, so load it before the subscriber.
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("medassist_backend=debug,tower_http=info,info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::from_env().context("failed to load configuration")?;

    info!("Configuration: {:?}", config);
    let addr = config.bind_addr();

    let state = Arc::new(AppState::from_config(config).context("failed to build HTTP clients")?);
    let app = routes::create_router().with_state(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("🚀 MedAssist running at http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}
