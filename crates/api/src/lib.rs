//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes wrapping the stored-call repositories
//! - The shared application state
//! - Response envelopes matching the portal's original wire format

pub mod routes;

use std::sync::Arc;

use axum::Router;
use ritefolio_core::notification::QueuePublisher;
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: PgPool,
    /// Message broker publisher for the notification side-channel.
    pub publisher: Arc<QueuePublisher>,
    /// Queue receiving strategic-rebranding events; absent means the
    /// rebranding path fails with a not-found error.
    pub rebranding_queue: Option<String>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
