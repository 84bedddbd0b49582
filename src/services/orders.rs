//! Order Manager
//!
//! The ledger's core state machine: order intake → validation → execution
//! → atomic balance/position update → persistence.
//!
//! Every order attempt that passes validation leaves exactly one order row
//! behind, in Pending or a terminal state. Execution applies the cash
//! delta, the position change, the trade record, and the order's terminal
//! state as a single transaction.

use crate::services::brokerage::BrokerageCalculator;
use crate::services::ledger::apply_fill;
use crate::services::store::SqliteStore;
use crate::sources::PriceFeed;
use crate::types::{
    Account, Instrument, InstrumentKind, Order, OrderReceipt, OrderSide, OrderStatus, OrderType,
    PlaceOrderRequest, PortfolioView, Position, Trade, WatchlistEntry,
};
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Trading service errors.
#[derive(Debug, Error)]
pub enum TradingError {
    #[error("Invalid order: {0}")]
    Validation(String),

    #[error("No price data available for {0}")]
    PriceUnavailable(String),

    #[error("Insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Decimal, available: Decimal },

    #[error("Insufficient position: requested {requested}, holding {held}")]
    InsufficientPosition { requested: i64, held: i64 },

    #[error("Sell quantity {requested} exceeds position quantity {held}")]
    OverSell { requested: i64, held: i64 },

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Order cannot be cancelled: status is {0}")]
    CannotCancel(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<rusqlite::Error> for TradingError {
    fn from(e: rusqlite::Error) -> Self {
        TradingError::Database(e.to_string())
    }
}

impl TradingError {
    /// Business-rule failures that reject the order but are otherwise a
    /// normal outcome: the attempt stays on record, nothing else mutates.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            TradingError::PriceUnavailable(_)
                | TradingError::InsufficientBalance { .. }
                | TradingError::InsufficientPosition { .. }
                | TradingError::OverSell { .. }
        )
    }
}

/// Paper trading order manager.
pub struct OrderManager {
    /// SQLite store for persistence
    store: Arc<SqliteStore>,
    /// Last-traded-price feed
    feed: Arc<PriceFeed>,
    /// Fee calculator
    brokerage: BrokerageCalculator,
    /// Accounts cache (account_id -> Account)
    accounts: DashMap<String, Account>,
    /// Balance granted to an account on first use
    starting_balance: Decimal,
    /// Upper bound on a single price fetch
    price_timeout: Duration,
}

impl OrderManager {
    /// Create a new order manager.
    pub fn new(
        store: Arc<SqliteStore>,
        feed: Arc<PriceFeed>,
        brokerage: BrokerageCalculator,
        starting_balance: Decimal,
        price_timeout: Duration,
    ) -> Self {
        Self {
            store,
            feed,
            brokerage,
            accounts: DashMap::new(),
            starting_balance,
            price_timeout,
        }
    }

    // ==========================================================================
    // Accounts
    // ==========================================================================

    /// Load an account, creating it with the starting balance on first use.
    pub fn account(&self, account_id: &str) -> Result<Account, TradingError> {
        if let Some(account) = self.accounts.get(account_id) {
            return Ok(account.clone());
        }

        if let Some(account) = self.store.get_account(account_id) {
            self.accounts.insert(account.id.clone(), account.clone());
            return Ok(account);
        }

        let account = Account::new(account_id.to_string(), self.starting_balance);
        self.store.create_account(&account)?;
        self.accounts.insert(account.id.clone(), account.clone());
        info!(
            "Opened account {} with starting balance {}",
            account.id, account.balance
        );
        Ok(account)
    }

    // ==========================================================================
    // Order Placement
    // ==========================================================================

    /// Place a new order.
    ///
    /// Market orders execute synchronously; other types persist as Pending
    /// until an external trigger calls [`OrderManager::execute_pending_order`].
    /// Business-rule rejections come back as a `success: false` receipt with
    /// the order recorded as Rejected; validation failures error out before
    /// anything is persisted.
    pub async fn place_order(
        &self,
        account_id: &str,
        request: PlaceOrderRequest,
    ) -> Result<OrderReceipt, TradingError> {
        let instrument = validate_request(&request)?;
        self.account(account_id)?;

        let mut order = Order::new(
            account_id.to_string(),
            instrument,
            request.order_type,
            request.side,
            request.quantity,
            request.price,
            request.trigger_price,
        );

        // Every validated attempt is auditable, even if execution rejects it
        self.store.create_order(&order)?;
        info!(
            "Placed order {} ({} {} {})",
            order.id,
            order.side,
            order.quantity,
            order.instrument.symbol()
        );

        if order.order_type != OrderType::Market {
            return Ok(OrderReceipt {
                success: true,
                message: "order accepted, awaiting trigger".to_string(),
                order_id: order.id,
                status: OrderStatus::Pending,
            });
        }

        match self.execute(&mut order, request.execution_price).await {
            Ok(trade) => Ok(OrderReceipt {
                success: true,
                message: format!("executed {} @ {}", trade.quantity, trade.price),
                order_id: order.id,
                status: OrderStatus::Executed,
            }),
            Err(e) => {
                order.mark_rejected(e.to_string());
                self.store.update_order(&order)?;
                warn!("Order {} rejected: {}", order.id, e);
                Ok(OrderReceipt {
                    success: false,
                    message: e.to_string(),
                    order_id: order.id,
                    status: OrderStatus::Rejected,
                })
            }
        }
    }

    /// Execute a pending order at the given trigger price.
    ///
    /// This is the same execution path market orders take; trigger
    /// detection itself lives outside the ledger.
    pub async fn execute_pending_order(
        &self,
        order_id: &str,
        price: Decimal,
    ) -> Result<Trade, TradingError> {
        let mut order = self
            .store
            .get_order(order_id)
            .ok_or_else(|| TradingError::OrderNotFound(order_id.to_string()))?;

        if order.is_terminal() {
            return Err(TradingError::Validation(format!(
                "Order {} is already {}",
                order_id, order.status
            )));
        }

        match self.execute(&mut order, Some(price)).await {
            Ok(trade) => Ok(trade),
            Err(e) if e.is_rejection() => {
                order.mark_rejected(e.to_string());
                self.store.update_order(&order)?;
                warn!("Order {} rejected on trigger: {}", order.id, e);
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Cancel a pending order.
    pub fn cancel_order(&self, order_id: &str) -> Result<Order, TradingError> {
        let mut order = self
            .store
            .get_order(order_id)
            .ok_or_else(|| TradingError::OrderNotFound(order_id.to_string()))?;

        if !order.can_cancel() {
            return Err(TradingError::CannotCancel(order.status.to_string()));
        }

        order.status = OrderStatus::Cancelled;
        order.updated_at = chrono::Utc::now().timestamp_millis();
        self.store.update_order(&order)?;

        info!("Cancelled order {}", order_id);
        Ok(order)
    }

    // ==========================================================================
    // Execution
    // ==========================================================================

    /// Execute an order: price it, fee it, and apply the fill to the
    /// account and position as one atomic unit.
    async fn execute(
        &self,
        order: &mut Order,
        explicit_price: Option<Decimal>,
    ) -> Result<Trade, TradingError> {
        let price = match explicit_price {
            Some(p) => p,
            None => self.fetch_price(&order.instrument).await?,
        };
        if price <= Decimal::ZERO {
            return Err(TradingError::PriceUnavailable(order.instrument.quote_symbol()));
        }

        let trade_value = price * Decimal::from(order.quantity);
        let brokerage = self.brokerage.fee(order.instrument.kind(), trade_value);

        // Re-read the account from the store: the cached copy may predate a
        // concurrent execution.
        let mut account = self
            .store
            .get_account(&order.account_id)
            .ok_or_else(|| TradingError::AccountNotFound(order.account_id.clone()))?;
        account.roll_day(chrono::Utc::now().date_naive());

        let key = order.instrument.position_key();
        let existing = self.store.get_open_position(&order.account_id, &key);

        let position = match order.side {
            OrderSide::Buy => {
                let net_value = trade_value + brokerage;
                if net_value > account.balance {
                    return Err(TradingError::InsufficientBalance {
                        needed: net_value,
                        available: account.balance,
                    });
                }

                let effect = apply_fill(
                    existing.as_ref().map(|p| (p.quantity, p.avg_price)),
                    OrderSide::Buy,
                    order.quantity,
                    price,
                )?;

                account.apply_cash_delta(-net_value);
                account.apply_invested_delta(trade_value);

                let mut position = existing.unwrap_or_else(|| {
                    Position::new(
                        order.account_id.clone(),
                        order.instrument.clone(),
                        effect.quantity,
                        price,
                    )
                });
                position.quantity = effect.quantity;
                position.avg_price = effect.avg_price;
                position.status = effect.status;
                position.update_price(price);
                position
            }
            OrderSide::Sell => {
                let mut position = match existing {
                    Some(p) => p,
                    None => {
                        return Err(TradingError::InsufficientPosition {
                            requested: order.quantity,
                            held: 0,
                        })
                    }
                };
                if order.quantity > position.quantity {
                    return Err(TradingError::InsufficientPosition {
                        requested: order.quantity,
                        held: position.quantity,
                    });
                }

                let effect = apply_fill(
                    Some((position.quantity, position.avg_price)),
                    OrderSide::Sell,
                    order.quantity,
                    price,
                )?;

                let net_value = trade_value - brokerage;
                account.apply_cash_delta(net_value);
                account.apply_invested_delta(-effect.released_cost);
                account.record_realized(effect.realized_pnl);

                position.quantity = effect.quantity;
                position.status = effect.status;
                position.update_price(price);
                position
            }
        };

        account.updated_at = chrono::Utc::now().timestamp_millis();
        order.mark_executed(price);
        let trade = Trade::new(order, order.quantity, price, brokerage);

        self.store
            .apply_execution(&account, &position, order, &trade)?;
        self.accounts.insert(account.id.clone(), account);

        info!(
            "Executed order {}: {} {} {} @ {} (fee {})",
            order.id,
            order.side,
            order.quantity,
            order.instrument.symbol(),
            price,
            brokerage
        );

        Ok(trade)
    }

    /// Fetch the last traded price, bounded by the configured timeout.
    async fn fetch_price(&self, instrument: &Instrument) -> Result<Decimal, TradingError> {
        let symbol = instrument.quote_symbol();
        match tokio::time::timeout(self.price_timeout, self.feed.last_price(instrument)).await {
            Ok(Ok(price)) => Ok(price),
            Ok(Err(e)) => {
                debug!("Quote fetch failed for {}: {}", symbol, e);
                Err(TradingError::PriceUnavailable(symbol))
            }
            Err(_) => {
                warn!("Quote fetch timed out for {}", symbol);
                Err(TradingError::PriceUnavailable(symbol))
            }
        }
    }

    // ==========================================================================
    // Query Surface
    // ==========================================================================

    /// Aggregated portfolio view: cash, invested amount, market value, P&L.
    pub fn get_portfolio(&self, account_id: &str) -> Result<PortfolioView, TradingError> {
        let mut account = self.account(account_id)?;
        // Display-only day roll; persisted on the next fill
        account.roll_day(chrono::Utc::now().date_naive());

        let positions = self.store.get_open_positions(account_id);
        let market_value: Decimal = positions.iter().map(|p| p.notional_value()).sum();
        let unrealized: Decimal = positions.iter().map(|p| p.pnl).sum();

        Ok(PortfolioView {
            account_id: account.id,
            balance: account.balance,
            invested_amount: account.invested_amount,
            total_value: account.balance + market_value,
            total_pnl: account.total_pnl,
            day_pnl: account.day_pnl,
            unrealized_pnl: unrealized,
            open_positions: positions.len() as u32,
        })
    }

    /// All open positions for an account.
    pub fn get_positions(&self, account_id: &str) -> Vec<Position> {
        self.store.get_open_positions(account_id)
    }

    /// Get an order by ID.
    pub fn get_order(&self, order_id: &str) -> Option<Order> {
        self.store.get_order(order_id)
    }

    /// Recent orders for an account, newest first.
    pub fn get_orders(&self, account_id: &str, limit: usize) -> Vec<Order> {
        self.store.get_account_orders(account_id, limit)
    }

    /// Recent trades for an account, newest first.
    pub fn get_trades(&self, account_id: &str, limit: usize) -> Vec<Trade> {
        self.store.get_account_trades(account_id, limit)
    }

    /// Watchlist for an account.
    pub fn get_watchlist(&self, account_id: &str) -> Vec<WatchlistEntry> {
        self.store.get_watchlist(account_id)
    }

    /// Add a symbol to the watchlist. Returns false if already present.
    pub fn add_to_watchlist(&self, account_id: &str, symbol: &str) -> Result<bool, TradingError> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(TradingError::Validation("symbol must not be empty".to_string()));
        }
        self.account(account_id)?;
        Ok(self.store.add_to_watchlist(account_id, symbol)?)
    }
}

/// Validate an order request into a concrete instrument.
///
/// Runs before any persistence: a request that fails here leaves no trace.
fn validate_request(request: &PlaceOrderRequest) -> Result<Instrument, TradingError> {
    if request.symbol.trim().is_empty() {
        return Err(TradingError::Validation("symbol is required".to_string()));
    }
    if request.quantity <= 0 {
        return Err(TradingError::Validation(
            "quantity must be positive".to_string(),
        ));
    }

    match request.order_type {
        OrderType::Limit => {
            if request.price.is_none() {
                return Err(TradingError::Validation(
                    "limit order requires price".to_string(),
                ));
            }
        }
        OrderType::StopLoss => {
            if request.trigger_price.is_none() || request.price.is_none() {
                return Err(TradingError::Validation(
                    "stop-loss order requires trigger_price and price".to_string(),
                ));
            }
        }
        OrderType::StopLossMarket => {
            if request.trigger_price.is_none() {
                return Err(TradingError::Validation(
                    "stop-loss market order requires trigger_price".to_string(),
                ));
            }
        }
        OrderType::Market => {}
    }

    match request.instrument_kind {
        InstrumentKind::Equity => Ok(Instrument::Equity {
            symbol: request.symbol.trim().to_uppercase(),
        }),
        InstrumentKind::Option => {
            let option_type = request.option_type.ok_or_else(|| {
                TradingError::Validation("option order requires option_type".to_string())
            })?;
            let strike = request.strike.ok_or_else(|| {
                TradingError::Validation("option order requires strike".to_string())
            })?;
            let expiry = request.expiry.ok_or_else(|| {
                TradingError::Validation("option order requires expiry".to_string())
            })?;
            if strike <= Decimal::ZERO {
                return Err(TradingError::Validation(
                    "strike must be positive".to_string(),
                ));
            }

            Ok(Instrument::Option {
                symbol: request.symbol.trim().to_uppercase(),
                option_type,
                strike,
                expiry,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_rejects_incomplete_option_spec() {
        let mut request = PlaceOrderRequest::market_equity("NIFTY", OrderSide::Buy, 50);
        request.instrument_kind = InstrumentKind::Option;

        let err = validate_request(&request).unwrap_err();
        assert!(matches!(err, TradingError::Validation(_)));
    }

    #[test]
    fn test_validation_rejects_non_positive_quantity() {
        let request = PlaceOrderRequest::market_equity("AAPL", OrderSide::Buy, 0);
        let err = validate_request(&request).unwrap_err();
        assert!(matches!(err, TradingError::Validation(_)));
    }

    #[test]
    fn test_validation_uppercases_symbol() {
        let request = PlaceOrderRequest::market_equity("aapl", OrderSide::Buy, 1);
        let instrument = validate_request(&request).unwrap();
        assert_eq!(instrument.symbol(), "AAPL");
    }

    #[test]
    fn test_limit_order_requires_price() {
        let mut request = PlaceOrderRequest::market_equity("AAPL", OrderSide::Buy, 1);
        request.order_type = OrderType::Limit;
        let err = validate_request(&request).unwrap_err();
        assert!(matches!(err, TradingError::Validation(_)));
    }

    #[test]
    fn test_rejection_classification() {
        assert!(TradingError::PriceUnavailable("AAPL".into()).is_rejection());
        assert!(TradingError::InsufficientBalance {
            needed: Decimal::from(100),
            available: Decimal::from(50),
        }
        .is_rejection());
        assert!(!TradingError::Validation("bad".into()).is_rejection());
        assert!(!TradingError::Database("io".into()).is_rejection());
    }
}
