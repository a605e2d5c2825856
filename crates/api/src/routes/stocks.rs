//! Stock master-data routes.
//!
//! The directory splits into listed stocks, unlisted stocks, and a staging
//! area for partially-known entries that a procedure later migrates into
//! the listed directory.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::AppState;
use ritefolio_db::procedures::stock::{
    StagingStockInput, StagingStockUpdate, StockDirectoryInput, StockFilter, StockRepository,
    StockSearch,
};
use ritefolio_shared::types::{PageMeta, PageRequest};

/// Creates the stock routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/stocks", get(search_stocks))
        .route("/stocks/listed", get(list_listed_stocks).post(create_listed_stock))
        .route("/stocks/staging", get(list_staging_stocks).post(create_staging_stock))
        .route(
            "/stocks/staging/{id}",
            get(get_staging_stock).put(update_staging_stock),
        )
        .route("/stocks/staging/{id}/migrate", post(migrate_staging_stock))
        .route(
            "/stocks/unlisted/{id}",
            get(get_unlisted_stock).put(update_unlisted_stock),
        )
}

/// Query parameters for the universal stock search.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockSearchQuery {
    /// Universal search across symbol, ISIN, name, and BSE code.
    pub search: Option<String>,
    /// Symbol search value.
    pub symbol: Option<String>,
    /// ISIN search value.
    pub isin: Option<String>,
    /// Name search value.
    pub stock_name: Option<String>,
    /// BSE code search value.
    pub bse_code: Option<String>,
    /// Investment type filter.
    pub investment_type_id: Option<i32>,
    /// Country filter.
    pub country_id: Option<i32>,
    /// Listed/unlisted filter.
    pub is_listed: Option<bool>,
    /// Active flag filter, defaults to true.
    pub is_active: Option<bool>,
    /// Exact stock id.
    pub stock_id: Option<Uuid>,
    /// Parent stock filter.
    pub parent_stock_id: Option<Uuid>,
    /// Result cap, defaults to 50.
    pub limit: Option<usize>,
}

/// Query parameters for the paginated directory and staging listings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockListQuery {
    /// Symbol filter.
    pub symbol: Option<String>,
    /// ISIN filter.
    pub isin: Option<String>,
    /// Name filter.
    pub stock_name: Option<String>,
    /// BSE code filter.
    pub bse_code: Option<String>,
    /// Investment type filter.
    pub investment_type: Option<i32>,
    /// Country filter.
    pub country_id: Option<i32>,
    /// Active flag filter, defaults to true.
    pub is_active: Option<bool>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size.
    pub limit: Option<u32>,
}

impl StockListQuery {
    fn page_request(&self) -> PageRequest {
        PageRequest {
            page: self.page.unwrap_or(1),
            limit: self.limit.unwrap_or(50),
        }
    }

    fn filter(&self) -> StockFilter {
        StockFilter {
            symbol: self.symbol.clone(),
            isin: self.isin.clone(),
            stock_name: self.stock_name.clone(),
            bse_code: self.bse_code.clone(),
            investment_type_id: self.investment_type,
            country_id: self.country_id,
            is_active: Some(self.is_active.unwrap_or(true)),
        }
    }
}

/// Request body for creating a listed stock or updating a directory stock.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockDirectoryPayload {
    /// Country of listing.
    pub country_id: Option<i32>,
    /// Investment type lookup id.
    pub investment_type: Option<i32>,
    /// Exchanges the stock trades on (create only).
    pub stock_exchange_ids: Option<Vec<i32>>,
    /// ISIN.
    pub isin: Option<String>,
    /// Stock name.
    pub stock_name: Option<String>,
    /// Face value.
    pub face_value: Option<Decimal>,
    /// Exchange symbol.
    pub symbol: Option<String>,
    /// BSE scrip code.
    pub bse_code: Option<String>,
    /// Macro sector classification.
    pub macro_sector: Option<String>,
    /// Sector classification.
    pub sector: Option<String>,
    /// Industry classification.
    pub industry: Option<String>,
    /// Basic industry classification.
    pub basic_industry: Option<String>,
    /// Sectoral index membership.
    pub sectoral_index: Option<String>,
    /// Securities-lending-and-borrowing eligibility.
    pub slb: Option<bool>,
    /// Listing date, epoch seconds.
    pub listing_date: Option<i64>,
    /// Record date, epoch seconds.
    pub record_date: Option<i64>,
    /// Issue date, epoch seconds.
    pub issue_date: Option<i64>,
    /// Maturity date, epoch seconds.
    pub maturity_date: Option<i64>,
    /// IPO date, epoch seconds.
    pub ipo_date: Option<i64>,
    /// Broad industry classification.
    pub broad_industry: Option<String>,
    /// Trading series.
    pub series: Option<String>,
    /// Issuer name.
    pub issuer: Option<String>,
    /// Coupon rate.
    pub coupon_rate: Option<Decimal>,
    /// Coupon payment frequency.
    pub coupon_frequency: Option<String>,
    /// Listing status.
    pub status: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Scheme name.
    pub scheme_name: Option<String>,
    /// Parent security.
    pub parent_stock_id: Option<Uuid>,
    /// Active flag, defaults to true.
    pub is_active: Option<bool>,
}

impl StockDirectoryPayload {
    fn directory_input(
        &self,
        country_id: i32,
        investment_type_id: i32,
        stock_name: String,
        face_value: Decimal,
    ) -> StockDirectoryInput {
        StockDirectoryInput {
            country_id,
            investment_type_id,
            isin: self.isin.clone(),
            stock_name,
            face_value,
            symbol: self.symbol.clone(),
            bse_code: self.bse_code.clone(),
            macro_sector: self.macro_sector.clone(),
            sector: self.sector.clone(),
            industry: self.industry.clone(),
            basic_industry: self.basic_industry.clone(),
            sectoral_index: self.sectoral_index.clone(),
            slb: self.slb.unwrap_or(false),
            listing_date: self.listing_date,
            record_date: self.record_date,
            issue_date: self.issue_date,
            maturity_date: self.maturity_date,
            ipo_date: self.ipo_date,
            broad_industry: self.broad_industry.clone(),
            series: self.series.clone(),
            issuer: self.issuer.clone(),
            coupon_rate: self.coupon_rate,
            coupon_frequency: self.coupon_frequency.clone(),
            status: self.status.clone(),
            description: self.description.clone(),
            scheme_name: self.scheme_name.clone(),
            parent_stock_id: self.parent_stock_id,
            is_active: self.is_active.unwrap_or(true),
        }
    }
}

/// Request body for creating a staging stock.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StagingStockPayload {
    /// Exchange symbol.
    pub symbol: Option<String>,
    /// ISIN.
    pub isin: Option<String>,
    /// BSE scrip code.
    pub bse_code: Option<String>,
    /// Stock name.
    pub stock_name: Option<String>,
    /// Country of listing.
    pub country_id: Option<i32>,
    /// Creating user reference.
    pub created_by: Option<String>,
}

/// Request body for updating a staging stock.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StagingStockUpdatePayload {
    /// Country of listing.
    pub country_id: Option<i32>,
    /// Investment type lookup id.
    pub investment_type: Option<i32>,
    /// ISIN.
    pub isin: Option<String>,
    /// Stock name.
    pub stock_name: Option<String>,
    /// Face value.
    pub face_value: Option<Decimal>,
    /// Exchange symbol.
    pub symbol: Option<String>,
    /// BSE scrip code.
    pub bse_code: Option<String>,
    /// Basic industry classification.
    pub basic_industry: Option<String>,
    /// Sectoral index membership.
    pub sectoral_index: Option<String>,
    /// Securities-lending-and-borrowing eligibility.
    pub slb: Option<bool>,
    /// Active flag, defaults to true.
    pub is_active: Option<bool>,
}

/// GET `/stocks` - Universal stock search.
async fn search_stocks(
    State(state): State<AppState>,
    Query(query): Query<StockSearchQuery>,
) -> impl IntoResponse {
    // A single search value fans out across all searchable columns.
    let search_value = query
        .search
        .or(query.symbol)
        .or(query.isin)
        .or(query.stock_name)
        .or(query.bse_code);

    let search = StockSearch {
        search_value,
        investment_type_id: query.investment_type_id,
        country_id: query.country_id,
        is_listed: query.is_listed,
        is_active: Some(query.is_active.unwrap_or(true)),
        stock_id: query.stock_id,
        parent_stock_id: query.parent_stock_id,
    };

    let repo = StockRepository::new(state.db.clone());
    match repo.search(&search).await {
        Ok(mut stocks) => {
            // Cap results for performance.
            stocks.truncate(query.limit.unwrap_or(50));
            let count = stocks.len();
            (
                StatusCode::OK,
                Json(json!({ "success": true, "data": stocks, "count": count })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to fetch stocks");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": "Failed to fetch stocks",
                    "message": e.to_string()
                })),
            )
                .into_response()
        }
    }
}

/// GET `/stocks/listed` - Paginated listed-stock listing.
async fn list_listed_stocks(
    State(state): State<AppState>,
    Query(query): Query<StockListQuery>,
) -> impl IntoResponse {
    let page = query.page_request();
    let repo = StockRepository::new(state.db.clone());

    match repo
        .fetch_directory(&query.filter(), true, page.offset(), page.limit())
        .await
    {
        Ok(stocks) => {
            let listed: Vec<_> = stocks.into_iter().filter(|s| s.listed).collect();
            let pagination = PageMeta::new(&page, listed.len());
            (
                StatusCode::OK,
                Json(json!({ "success": true, "data": listed, "pagination": pagination })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to fetch listed stocks");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": "Failed to fetch listed stocks",
                    "message": e.to_string()
                })),
            )
                .into_response()
        }
    }
}

/// POST `/stocks/listed` - Add a listed stock.
async fn create_listed_stock(
    State(state): State<AppState>,
    Json(payload): Json<StockDirectoryPayload>,
) -> impl IntoResponse {
    let (
        Some(country_id),
        Some(investment_type_id),
        Some(_),
        Some(stock_name),
        Some(face_value),
        Some(_),
        Some(stock_exchange_ids),
    ) = (
        payload.country_id,
        payload.investment_type,
        payload.isin.as_deref(),
        payload.stock_name.clone(),
        payload.face_value,
        payload.symbol.as_deref(),
        payload.stock_exchange_ids.clone(),
    )
    else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "error": "Missing required fields"
            })),
        )
            .into_response();
    };

    let input = payload.directory_input(country_id, investment_type_id, stock_name, face_value);

    let repo = StockRepository::new(state.db.clone());
    match repo.insert_listed(&stock_exchange_ids, &input).await {
        Ok(()) => {
            info!(isin = input.isin.as_deref().unwrap_or(""), "Listed stock added");
            (
                StatusCode::CREATED,
                Json(json!({
                    "success": true,
                    "message": "Listed stock added successfully"
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to add listed stock");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": "Failed to add listed stock",
                    "message": e.to_string()
                })),
            )
                .into_response()
        }
    }
}

/// GET `/stocks/staging` - Paginated staging-stock listing.
async fn list_staging_stocks(
    State(state): State<AppState>,
    Query(query): Query<StockListQuery>,
) -> impl IntoResponse {
    let page = query.page_request();
    let repo = StockRepository::new(state.db.clone());

    match repo
        .fetch_staging(&query.filter(), page.offset(), page.limit())
        .await
    {
        Ok(stocks) => {
            let pagination = PageMeta::new(&page, stocks.len());
            (
                StatusCode::OK,
                Json(json!({ "success": true, "data": stocks, "pagination": pagination })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to fetch staging stocks");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": "Failed to fetch staging stocks",
                    "message": e.to_string()
                })),
            )
                .into_response()
        }
    }
}

/// POST `/stocks/staging` - Add a staging stock from whatever identifiers
/// are known.
async fn create_staging_stock(
    State(state): State<AppState>,
    Json(payload): Json<StagingStockPayload>,
) -> impl IntoResponse {
    if payload.symbol.is_none() && payload.isin.is_none() && payload.bse_code.is_none() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "error": "At least one of Symbol, ISIN, or BSE Code must be provided"
            })),
        )
            .into_response();
    }

    let input = StagingStockInput {
        symbol: payload.symbol,
        isin: payload.isin,
        bse_code: payload.bse_code,
        stock_name: payload.stock_name,
        country_id: payload.country_id,
        created_by: payload.created_by,
    };

    let repo = StockRepository::new(state.db.clone());
    match repo.insert_staging(&input).await {
        Ok(created) => {
            info!(stock_id = %created.v_stock_id, "Staging stock added");
            (
                StatusCode::CREATED,
                Json(json!({
                    "success": true,
                    "message": "Staging stock added successfully",
                    "data": created
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to add staging stock");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": "Failed to add staging stock",
                    "message": e.to_string()
                })),
            )
                .into_response()
        }
    }
}

/// GET `/stocks/staging/{id}` - Fetch a single staging stock.
async fn get_staging_stock(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = StockRepository::new(state.db.clone());

    match repo.fetch_staging_by_id(id).await {
        Ok(Some(stock)) => {
            (StatusCode::OK, Json(json!({ "success": true, "data": stock }))).into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "success": false,
                "error": "Stock not found"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to fetch staging stock");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": "Failed to fetch staging stock",
                    "message": e.to_string()
                })),
            )
                .into_response()
        }
    }
}

/// PUT `/stocks/staging/{id}` - Update a staging stock.
async fn update_staging_stock(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StagingStockUpdatePayload>,
) -> impl IntoResponse {
    let update = StagingStockUpdate {
        country_id: payload.country_id,
        investment_type_id: payload.investment_type,
        isin: payload.isin,
        stock_name: payload.stock_name,
        face_value: payload.face_value,
        symbol: payload.symbol,
        bse_code: payload.bse_code,
        basic_industry: payload.basic_industry,
        sectoral_index: payload.sectoral_index,
        slb: payload.slb.unwrap_or(false),
        is_active: payload.is_active.unwrap_or(true),
    };

    let repo = StockRepository::new(state.db.clone());
    match repo.update_staging(id, &update).await {
        Ok(()) => {
            info!(stock_id = %id, "Staging stock updated");
            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "message": "Stock updated successfully"
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to update staging stock");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": "Failed to update staging stock",
                    "message": e.to_string()
                })),
            )
                .into_response()
        }
    }
}

/// POST `/stocks/staging/{id}/migrate` - Promote a staging stock into the
/// listed directory.
async fn migrate_staging_stock(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = StockRepository::new(state.db.clone());

    match repo.migrate_staging(id).await {
        Ok(()) => {
            info!(stock_id = %id, "Staging stock migrated to listed");
            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "message": "Stock migrated to listed stocks successfully"
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to migrate staging stock");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": "Failed to migrate stock",
                    "message": e.to_string()
                })),
            )
                .into_response()
        }
    }
}

/// GET `/stocks/unlisted/{id}` - Fetch a single unlisted stock.
async fn get_unlisted_stock(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = StockRepository::new(state.db.clone());

    match repo.fetch_unlisted_by_id(id).await {
        Ok(Some(stock)) => {
            (StatusCode::OK, Json(json!({ "success": true, "data": stock }))).into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "success": false,
                "error": "Stock not found"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to fetch stock");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": "Failed to fetch stock",
                    "message": e.to_string()
                })),
            )
                .into_response()
        }
    }
}

/// PUT `/stocks/unlisted/{id}` - Update an unlisted stock.
async fn update_unlisted_stock(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StockDirectoryPayload>,
) -> impl IntoResponse {
    let (Some(country_id), Some(investment_type_id), Some(stock_name), Some(face_value)) = (
        payload.country_id,
        payload.investment_type,
        payload.stock_name.clone(),
        payload.face_value,
    ) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "error": "Missing required fields",
                "message": "Country, Investment Type, Stock Name, and Face Value are required"
            })),
        )
            .into_response();
    };

    let mut input =
        payload.directory_input(country_id, investment_type_id, stock_name, face_value);
    // Listing dates do not apply off-exchange.
    input.listing_date = None;

    let repo = StockRepository::new(state.db.clone());
    match repo.update_directory(id, false, &input).await {
        Ok(()) => {
            info!(stock_id = %id, "Unlisted stock updated");
            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "message": "Stock updated successfully"
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to update stock");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": "Failed to update stock",
                    "message": e.to_string()
                })),
            )
                .into_response()
        }
    }
}
