//! Ritefolio back-office API server
//!
//! Main entry point for the stored-procedure gateway service.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ritefolio_api::{AppState, create_router};
use ritefolio_core::notification::QueuePublisher;
use ritefolio_db::connect;
use ritefolio_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ritefolio=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Connect to database
    let db = connect(&config.database).await?;
    info!("Connected to database");

    // Create the message broker publisher; the connection itself opens
    // lazily on first publish.
    let publisher = QueuePublisher::new(config.amqp.url.clone());
    match config.amqp.rebranding_queue.as_deref() {
        Some(queue) => info!(queue, "Rebranding event queue configured"),
        None => warn!("No rebranding event queue configured; type-16 creations will fail"),
    }

    // Create application state
    let state = AppState {
        db,
        publisher: Arc::new(publisher),
        rebranding_queue: config.amqp.rebranding_queue.clone(),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
