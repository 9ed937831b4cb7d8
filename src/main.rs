use std::net::SocketAddr;
use std::sync::Arc;

use dashlink::common::logger;
use dashlink::configs::Config;
use dashlink::server::AppState;
use dashlink::transport;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;

    logger::init(&config);

    let address: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    let state = Arc::new(AppState::new(config)?);
    let app = transport::http_server::router(state.clone());

    info!("Dashlink listening on {}", address);

    let listener = tokio::net::TcpListener::bind(address).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await?;

    Ok(())
}

async fn shutdown_signal(state: Arc<dashlink::server::AppState>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        return;
    }

    info!("Shutdown signal received, stopping {} session(s)", state.sessions.len());
    for session in state.sessions.iter() {
        session.value().shutdown();
    }
    state.sessions.clear();
}
