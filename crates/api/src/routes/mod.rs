//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod brokers;
pub mod corporate_actions;
pub mod currencies;
pub mod health;
pub mod stocks;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(brokers::routes())
        .merge(currencies::routes())
        .merge(stocks::routes())
        .merge(corporate_actions::routes())
}
