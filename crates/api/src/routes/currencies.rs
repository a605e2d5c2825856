//! Currency routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::AppState;
use ritefolio_db::procedures::currency::{CurrencyInput, CurrencyRepository};

/// Creates the currency routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/currency", get(list_currencies).post(create_currency))
}

/// Request body for creating a currency.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCurrencyRequest {
    /// Currency name.
    pub name: Option<String>,
    /// ISO 4217 currency code.
    pub currency_code: Option<String>,
    /// Display symbol.
    pub currency_symbol: Option<String>,
    /// Active flag, defaults to true.
    pub is_active: Option<bool>,
}

/// GET `/currency` - List all currencies.
async fn list_currencies(State(state): State<AppState>) -> impl IntoResponse {
    let repo = CurrencyRepository::new(state.db.clone());

    match repo.fetch_all().await {
        Ok(currencies) => (
            StatusCode::OK,
            Json(json!({ "success": true, "data": currencies })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to fetch currencies");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": "Failed to fetch currencies",
                    "message": e.to_string()
                })),
            )
                .into_response()
        }
    }
}

/// POST `/currency` - Create a new currency.
async fn create_currency(
    State(state): State<AppState>,
    Json(payload): Json<CreateCurrencyRequest>,
) -> impl IntoResponse {
    let (Some(name), Some(currency_code), Some(currency_symbol)) = (
        payload.name,
        payload.currency_code,
        payload.currency_symbol,
    ) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "error": "Missing required fields",
                "message": "Name, currencyCode, and currencySymbol are required"
            })),
        )
            .into_response();
    };

    let input = CurrencyInput {
        name,
        currency_code,
        currency_symbol,
        is_active: payload.is_active.unwrap_or(true),
    };

    let repo = CurrencyRepository::new(state.db.clone());
    match repo.insert(&input).await {
        Ok(()) => {
            info!(currency_code = %input.currency_code, "Currency created");
            (
                StatusCode::CREATED,
                Json(json!({
                    "success": true,
                    "message": "Currency created successfully"
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create currency");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": "Failed to create currency",
                    "message": e.to_string()
                })),
            )
                .into_response()
        }
    }
}
