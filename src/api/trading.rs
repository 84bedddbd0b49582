//! Trading API
//!
//! HTTP surface over the order manager. Thin I/O wrappers only; every
//! ledger rule lives in the services layer.
//!
//! Orders:
//! - POST /api/trading/orders - Place a new order
//! - GET /api/trading/orders - List recent orders
//! - GET /api/trading/orders/:id - Get order details
//! - DELETE /api/trading/orders/:id - Cancel a pending order
//!
//! Portfolio:
//! - GET /api/trading/portfolio - Aggregated account view
//! - GET /api/trading/positions - List open positions
//! - GET /api/trading/trades - List recent trades
//!
//! Watchlist:
//! - GET /api/trading/watchlist - List watched symbols
//! - POST /api/trading/watchlist - Add a symbol
//!
//! Prices:
//! - POST /api/trading/refresh - Run a price refresh sweep now
//!
//! The account comes from the optional `account` query parameter; this is
//! the only place the default account id is filled in.

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::services::TradingError;
use crate::types::{
    Order, OrderReceipt, PlaceOrderRequest, PortfolioView, Position, SweepReport, Trade,
    WatchlistEntry,
};
use crate::AppState;

/// Create trading router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/portfolio", get(get_portfolio))
        .route("/positions", get(list_positions))
        .route("/orders", get(list_orders))
        .route("/orders", post(place_order))
        .route("/orders/:id", get(get_order))
        .route("/orders/:id", delete(cancel_order))
        .route("/trades", get(list_trades))
        .route("/watchlist", get(get_watchlist))
        .route("/watchlist", post(add_to_watchlist))
        .route("/refresh", post(refresh_prices))
}

/// Standard API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

// =============================================================================
// Query Parameters
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct AccountQuery {
    pub account: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub account: Option<String>,
    pub limit: Option<usize>,
}

const DEFAULT_HISTORY_LIMIT: usize = 50;

fn resolve_account(state: &AppState, account: &Option<String>) -> String {
    account
        .clone()
        .unwrap_or_else(|| state.config.default_account_id.clone())
}

// =============================================================================
// Order Handlers
// =============================================================================

/// POST /api/trading/orders
///
/// Place a new order. Business-rule rejections come back as a 200 with
/// `success: false` in the receipt; malformed specs are a 400.
async fn place_order(
    State(state): State<AppState>,
    Query(query): Query<AccountQuery>,
    Json(request): Json<PlaceOrderRequest>,
) -> Result<Json<ApiResponse<OrderReceipt>>, AppError> {
    let account = resolve_account(&state, &query.account);
    let receipt = state.orders.place_order(&account, request).await?;
    Ok(Json(ApiResponse { data: receipt }))
}

/// GET /api/trading/orders
async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Json<ApiResponse<Vec<Order>>> {
    let account = resolve_account(&state, &query.account);
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let orders = state.orders.get_orders(&account, limit);
    Json(ApiResponse { data: orders })
}

/// GET /api/trading/orders/:id
async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Order>>, AppError> {
    let order = state
        .orders
        .get_order(&id)
        .ok_or(TradingError::OrderNotFound(id))?;
    Ok(Json(ApiResponse { data: order }))
}

/// DELETE /api/trading/orders/:id
async fn cancel_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Order>>, AppError> {
    let order = state.orders.cancel_order(&id)?;
    Ok(Json(ApiResponse { data: order }))
}

// =============================================================================
// Portfolio Handlers
// =============================================================================

/// GET /api/trading/portfolio
async fn get_portfolio(
    State(state): State<AppState>,
    Query(query): Query<AccountQuery>,
) -> Result<Json<ApiResponse<PortfolioView>>, AppError> {
    let account = resolve_account(&state, &query.account);
    let portfolio = state.orders.get_portfolio(&account)?;
    Ok(Json(ApiResponse { data: portfolio }))
}

/// GET /api/trading/positions
async fn list_positions(
    State(state): State<AppState>,
    Query(query): Query<AccountQuery>,
) -> Json<ApiResponse<Vec<Position>>> {
    let account = resolve_account(&state, &query.account);
    let positions = state.orders.get_positions(&account);
    Json(ApiResponse { data: positions })
}

/// GET /api/trading/trades
async fn list_trades(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Json<ApiResponse<Vec<Trade>>> {
    let account = resolve_account(&state, &query.account);
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let trades = state.orders.get_trades(&account, limit);
    Json(ApiResponse { data: trades })
}

// =============================================================================
// Watchlist Handlers
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct AddWatchlistRequest {
    pub symbol: String,
}

/// GET /api/trading/watchlist
async fn get_watchlist(
    State(state): State<AppState>,
    Query(query): Query<AccountQuery>,
) -> Json<ApiResponse<Vec<WatchlistEntry>>> {
    let account = resolve_account(&state, &query.account);
    let watchlist = state.orders.get_watchlist(&account);
    Json(ApiResponse { data: watchlist })
}

/// POST /api/trading/watchlist
async fn add_to_watchlist(
    State(state): State<AppState>,
    Query(query): Query<AccountQuery>,
    Json(request): Json<AddWatchlistRequest>,
) -> Result<Json<ApiResponse<Vec<WatchlistEntry>>>, AppError> {
    let account = resolve_account(&state, &query.account);
    state.orders.add_to_watchlist(&account, &request.symbol)?;
    let watchlist = state.orders.get_watchlist(&account);
    Ok(Json(ApiResponse { data: watchlist }))
}

// =============================================================================
// Price Refresh
// =============================================================================

/// POST /api/trading/refresh
///
/// Run a price refresh sweep for the account and return the per-symbol
/// report.
async fn refresh_prices(
    State(state): State<AppState>,
    Query(query): Query<AccountQuery>,
) -> Json<ApiResponse<SweepReport>> {
    let account = resolve_account(&state, &query.account);
    let report = state.refresher.refresh_account(&account).await;
    Json(ApiResponse { data: report })
}
