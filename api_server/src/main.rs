use api_server::{create_router, AppState};
use config_manager::SystemConfig;
use entrypoints::Dispatcher;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration first so it can choose the log format
    let config = SystemConfig::load()?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,api_server=debug".into());
    if config.system.json_logs {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    info!("Starting Courtside API Server...");
    info!("Configuration loaded successfully");

    let dispatcher = Arc::new(Dispatcher::from_config(&config)?);
    let app = create_router(AppState::new(dispatcher.clone(), config.api.request_timeout_seconds));

    info!("🎯 API Server ready");
    info!("📋 Available endpoints:");
    info!("   • GET /health - Health check");
    info!("   • GET /entrypoints - Discovery document");
    info!("   • POST /entrypoints/:name/invoke - Invoke an entrypoint");
    for name in dispatcher.names() {
        info!("     - {}", name);
    }

    // Bind and serve
    let bind_addr = format!("{}:{}", config.api.host, config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Server listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
