//! Siteround Server — application entry point.

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod extract;
mod handlers;
mod routes;
mod state;
mod views;

use config::ServerConfig;
use siteround_db::DbManager;
use state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("siteround=info".parse()?),
        )
        .json()
        .init();

    let config = ServerConfig::from_env();

    let manager = DbManager::connect(&config.db).await?;
    siteround_db::run_migrations(manager.client()).await?;

    let state = AppState::new(&manager, config.auth.clone());
    let app = routes::router(state);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %config.bind_addr, "siteround server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("siteround server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to install shutdown handler");
    }
}
