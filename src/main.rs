//! problembot - contest-problem recommendation webhook bot
//!
//! Receives chat platform updates over a webhook, walks each user through a
//! short dialogue to collect a difficulty rating or topic tag plus a count,
//! and answers with problems sampled from a cached upstream catalog.

mod api;
mod catalog;
mod db;
mod gateway;
mod render;
mod runtime;
mod state_machine;

use api::{create_router, AppState};
use catalog::{CatalogCache, CodeforcesClient};
use db::Database;
use gateway::TelegramGateway;
use runtime::Dispatcher;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "problembot=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let token = std::env::var("BOT_TOKEN").map_err(|_| "BOT_TOKEN is not set")?;

    let db_path = std::env::var("PROBLEMBOT_DB_PATH").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
        format!("{home}/.problembot/problembot.db")
    });

    let port: u16 = std::env::var("PROBLEMBOT_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);

    let catalog_url = std::env::var("CATALOG_URL")
        .unwrap_or_else(|_| CodeforcesClient::DEFAULT_URL.to_string());

    let api_base = std::env::var("TELEGRAM_API_BASE")
        .unwrap_or_else(|_| "https://api.telegram.org".to_string());

    // Ensure database directory exists
    if let Some(parent) = PathBuf::from(&db_path).parent() {
        std::fs::create_dir_all(parent)?;
    }

    tracing::info!(path = %db_path, "Opening database");
    let db = Database::open(&db_path)?;

    let catalog = Arc::new(CatalogCache::new(Arc::new(CodeforcesClient::new(
        catalog_url,
    ))));
    let gateway = TelegramGateway::new(&api_base, &token);
    let state = AppState::new(Dispatcher::new(db, catalog, gateway));

    let app = create_router(state).layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("problembot listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
