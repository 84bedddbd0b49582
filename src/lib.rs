//! Folio - paper trading brokerage ledger server
//!
//! Accepts simulated buy/sell orders against a starting cash balance,
//! executes them against an externally supplied market price, and keeps
//! the account state consistent: cash, open positions, realized and
//! unrealized P&L, order and trade history.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod types;

use config::Config;
use services::{OrderManager, PriceRefresher};
use std::sync::Arc;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub orders: Arc<OrderManager>,
    pub refresher: Arc<PriceRefresher>,
}

// Re-export commonly used types
pub use types::*;
