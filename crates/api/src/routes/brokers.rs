//! Stock broker routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::AppState;
use ritefolio_db::procedures::broker::{BrokerInput, BrokerRepository};

/// Creates the broker routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/broker", get(list_brokers).post(create_broker))
        .route(
            "/broker/{id}",
            get(get_broker).put(update_broker).delete(delete_broker),
        )
}

/// Request body for creating or updating a broker.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokerPayload {
    /// Broker name.
    pub name: Option<String>,
    /// Short display code.
    pub short_code: Option<String>,
    /// Whether the entity acts as a full-service broker.
    pub is_broker: Option<bool>,
    /// Whether the entity is a discount broker.
    pub is_discount_broker: Option<bool>,
    /// Active flag.
    pub is_active: Option<bool>,
}

/// GET `/broker` - List all brokers.
async fn list_brokers(State(state): State<AppState>) -> impl IntoResponse {
    let repo = BrokerRepository::new(state.db.clone());

    match repo.fetch_all().await {
        Ok(brokers) => {
            (StatusCode::OK, Json(json!({ "success": true, "data": brokers }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to fetch brokers");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": "Failed to fetch brokers",
                    "message": e.to_string()
                })),
            )
                .into_response()
        }
    }
}

/// GET `/broker/{id}` - Fetch a single broker.
async fn get_broker(State(state): State<AppState>, Path(id): Path<i32>) -> impl IntoResponse {
    let repo = BrokerRepository::new(state.db.clone());

    match repo.fetch_by_id(id).await {
        Ok(Some(broker)) => {
            (StatusCode::OK, Json(json!({ "success": true, "data": broker }))).into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "success": false,
                "error": "Broker not found"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to fetch broker");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": "Failed to fetch broker",
                    "message": e.to_string()
                })),
            )
                .into_response()
        }
    }
}

/// POST `/broker` - Create a new broker.
async fn create_broker(
    State(state): State<AppState>,
    Json(payload): Json<BrokerPayload>,
) -> impl IntoResponse {
    let (Some(name), Some(short_code)) = (payload.name.clone(), payload.short_code.clone()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "error": "Missing required fields",
                "message": "Name and shortCode are required"
            })),
        )
            .into_response();
    };

    let input = BrokerInput {
        name,
        short_code,
        is_broker: Some(payload.is_broker.unwrap_or(true)),
        is_discount_broker: Some(payload.is_discount_broker.unwrap_or(true)),
        is_active: Some(payload.is_active.unwrap_or(true)),
    };

    let repo = BrokerRepository::new(state.db.clone());
    match repo.insert(&input).await {
        Ok(()) => {
            info!(name = %input.name, short_code = %input.short_code, "Broker created");
            (
                StatusCode::CREATED,
                Json(json!({
                    "success": true,
                    "message": "Broker created successfully"
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create broker");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": "Failed to create broker",
                    "message": e.to_string()
                })),
            )
                .into_response()
        }
    }
}

/// PUT `/broker/{id}` - Update a broker.
async fn update_broker(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<BrokerPayload>,
) -> impl IntoResponse {
    let (Some(name), Some(short_code)) = (payload.name.clone(), payload.short_code.clone()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "error": "Missing required fields",
                "message": "Name and shortCode are required"
            })),
        )
            .into_response();
    };

    // Flags pass through as given; the procedure handles nulls.
    let input = BrokerInput {
        name,
        short_code,
        is_broker: payload.is_broker,
        is_discount_broker: payload.is_discount_broker,
        is_active: payload.is_active,
    };

    let repo = BrokerRepository::new(state.db.clone());
    match repo.update(id, &input).await {
        Ok(()) => {
            info!(broker_id = id, "Broker updated");
            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "message": "Broker updated successfully"
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to update broker");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": "Failed to update broker",
                    "message": e.to_string()
                })),
            )
                .into_response()
        }
    }
}

/// DELETE `/broker/{id}` - Delete a broker.
async fn delete_broker(State(state): State<AppState>, Path(id): Path<i32>) -> impl IntoResponse {
    let repo = BrokerRepository::new(state.db.clone());

    match repo.delete(id).await {
        Ok(()) => {
            info!(broker_id = id, "Broker deleted");
            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "message": "Broker deleted successfully"
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to delete broker");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": "Failed to delete broker",
                    "message": e.to_string()
                })),
            )
                .into_response()
        }
    }
}
