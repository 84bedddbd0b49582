//! Trading Types
//!
//! Types for the paper trading ledger: instruments, orders, positions,
//! trades, and the account state they act on.
//!
//! All monetary fields are `rust_decimal::Decimal`: balances and average
//! prices are recomputed repeatedly and must not drift the way binary
//! floats do.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Enums
// =============================================================================

/// Instrument class for an order or position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentKind {
    /// Cash equity
    Equity,
    /// Option contract
    Option,
}

impl std::fmt::Display for InstrumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstrumentKind::Equity => write!(f, "equity"),
            InstrumentKind::Option => write!(f, "option"),
        }
    }
}

/// Option type (Call or Put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionType {
    /// Right to buy at strike price
    Call,
    /// Right to sell at strike price
    Put,
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionType::Call => write!(f, "call"),
            OptionType::Put => write!(f, "put"),
        }
    }
}

/// Order side (buy or sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "buy"),
            OrderSide::Sell => write!(f, "sell"),
        }
    }
}

/// Order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    /// Execute immediately at the last traded price
    Market,
    /// Execute at specified price or better (externally triggered)
    Limit,
    /// Trigger at stop price, then execute at limit price
    StopLoss,
    /// Trigger at stop price, then execute at market
    StopLossMarket,
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderType::Market => write!(f, "market"),
            OrderType::Limit => write!(f, "limit"),
            OrderType::StopLoss => write!(f, "stop_loss"),
            OrderType::StopLossMarket => write!(f, "stop_loss_market"),
        }
    }
}

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order is persisted and waiting for execution or a trigger
    Pending,
    /// Order executed in full
    Executed,
    /// Order was rejected (validation passed but execution failed)
    Rejected,
    /// Order was cancelled before execution
    Cancelled,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Executed => write!(f, "executed"),
            OrderStatus::Rejected => write!(f, "rejected"),
            OrderStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Position status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionStatus {
    /// Position has non-zero quantity
    Open,
    /// Quantity reached zero; the row is immutable from here on
    Closed,
}

impl std::fmt::Display for PositionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PositionStatus::Open => write!(f, "open"),
            PositionStatus::Closed => write!(f, "closed"),
        }
    }
}

// =============================================================================
// Instrument
// =============================================================================

/// A tradeable instrument, validated at construction.
///
/// Option contracts carry their full identity (type, strike, expiry); an
/// order spec missing any of those fields never becomes an `Instrument`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Instrument {
    Equity {
        symbol: String,
    },
    Option {
        symbol: String,
        option_type: OptionType,
        strike: Decimal,
        expiry: NaiveDate,
    },
}

impl Instrument {
    /// Underlying symbol.
    pub fn symbol(&self) -> &str {
        match self {
            Instrument::Equity { symbol } => symbol,
            Instrument::Option { symbol, .. } => symbol,
        }
    }

    /// Instrument class.
    pub fn kind(&self) -> InstrumentKind {
        match self {
            Instrument::Equity { .. } => InstrumentKind::Equity,
            Instrument::Option { .. } => InstrumentKind::Option,
        }
    }

    /// Canonical key for position lookup within an account.
    pub fn position_key(&self) -> String {
        match self {
            Instrument::Equity { symbol } => format!("equity:{}", symbol.to_uppercase()),
            Instrument::Option {
                symbol,
                option_type,
                strike,
                expiry,
            } => format!(
                "option:{}:{}:{}:{}",
                symbol.to_uppercase(),
                option_type,
                strike.normalize(),
                expiry
            ),
        }
    }

    /// Symbol to quote against the price feed.
    ///
    /// Equities quote under their own symbol; options use the OCC-style
    /// contract symbol (e.g., "AAPL260116C00150000").
    pub fn quote_symbol(&self) -> String {
        match self {
            Instrument::Equity { symbol } => symbol.to_uppercase(),
            Instrument::Option {
                symbol,
                option_type,
                strike,
                expiry,
            } => {
                let date_str = expiry.format("%y%m%d").to_string();
                let type_char = match option_type {
                    OptionType::Call => "C",
                    OptionType::Put => "P",
                };
                let strike_milli = (*strike * Decimal::from(1000)).trunc();
                format!(
                    "{}{}{}{:0>8}",
                    symbol.to_uppercase(),
                    date_str,
                    type_char,
                    strike_milli
                )
            }
        }
    }
}

// =============================================================================
// Account
// =============================================================================

/// Cash and P&L state for a single account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Account identifier
    pub id: String,
    /// Cash balance available for new buys
    pub balance: Decimal,
    /// Sum of cost basis across open positions
    pub invested_amount: Decimal,
    /// Accumulated realized P&L over the account's lifetime
    pub total_pnl: Decimal,
    /// Realized P&L accrued during the current UTC day
    pub day_pnl: Decimal,
    /// UTC date the day P&L counter belongs to
    pub day_anchor: NaiveDate,
    /// When account was created (ms)
    pub created_at: i64,
    /// When account was last updated (ms)
    pub updated_at: i64,
}

impl Account {
    /// Create a new account with the given starting balance.
    pub fn new(id: String, starting_balance: Decimal) -> Self {
        let now = chrono::Utc::now();
        Self {
            id,
            balance: starting_balance,
            invested_amount: Decimal::ZERO,
            total_pnl: Decimal::ZERO,
            day_pnl: Decimal::ZERO,
            day_anchor: now.date_naive(),
            created_at: now.timestamp_millis(),
            updated_at: now.timestamp_millis(),
        }
    }

    /// Reset the day P&L counter if the UTC day has rolled over.
    pub fn roll_day(&mut self, today: NaiveDate) {
        if self.day_anchor != today {
            self.day_anchor = today;
            self.day_pnl = Decimal::ZERO;
        }
    }

    /// Record realized P&L from a reducing fill.
    pub fn record_realized(&mut self, pnl: Decimal) {
        self.total_pnl += pnl;
        self.day_pnl += pnl;
    }

    /// Apply a fill's cash delta (negative for buys).
    pub fn apply_cash_delta(&mut self, amount: Decimal) {
        self.balance += amount;
    }

    /// Apply a fill's invested-amount delta (negative for reducing fills).
    pub fn apply_invested_delta(&mut self, amount: Decimal) {
        self.invested_amount += amount;
    }
}

// =============================================================================
// Position
// =============================================================================

/// An open or closed position for one instrument within an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    /// Unique position ID
    pub id: String,
    /// Account this position belongs to
    pub account_id: String,
    /// Instrument held
    pub instrument: Instrument,
    /// Quantity held (positive = long)
    pub quantity: i64,
    /// Quantity-weighted average acquisition price
    pub avg_price: Decimal,
    /// Last known market price
    pub current_price: Decimal,
    /// Unrealized P&L at `current_price`
    pub pnl: Decimal,
    /// Unrealized P&L as a percentage of cost basis
    pub pnl_percent: Decimal,
    /// Open or closed
    pub status: PositionStatus,
    /// When position was opened (ms)
    pub created_at: i64,
    /// When position was last updated (ms)
    pub updated_at: i64,
}

impl Position {
    /// Open a new position from a first fill.
    pub fn new(account_id: String, instrument: Instrument, quantity: i64, price: Decimal) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            account_id,
            instrument,
            quantity,
            avg_price: price,
            current_price: price,
            pnl: Decimal::ZERO,
            pnl_percent: Decimal::ZERO,
            status: PositionStatus::Open,
            created_at: now,
            updated_at: now,
        }
    }

    /// Update the position with a new market price and recompute
    /// unrealized P&L.
    pub fn update_price(&mut self, price: Decimal) {
        self.current_price = price;

        let qty = Decimal::from(self.quantity);
        let cost = self.avg_price * qty;
        self.pnl = (price - self.avg_price) * qty;
        self.pnl_percent = if cost > Decimal::ZERO {
            (self.pnl / cost) * Decimal::from(100)
        } else {
            Decimal::ZERO
        };

        self.updated_at = chrono::Utc::now().timestamp_millis();
    }

    /// Market value of the open quantity at the last known price.
    pub fn notional_value(&self) -> Decimal {
        self.current_price * Decimal::from(self.quantity)
    }

    /// Cost basis of the open quantity.
    pub fn cost_basis(&self) -> Decimal {
        self.avg_price * Decimal::from(self.quantity)
    }
}

// =============================================================================
// Order
// =============================================================================

/// A trading order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique order ID
    pub id: String,
    /// Account this order belongs to
    pub account_id: String,
    /// Instrument being traded
    pub instrument: Instrument,
    /// Order type
    pub order_type: OrderType,
    /// Buy or sell
    pub side: OrderSide,
    /// Quantity to fill
    pub quantity: i64,
    /// Limit price (for limit and stop-loss limit orders)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    /// Trigger price (for stop orders)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_price: Option<Decimal>,
    /// Quantity already filled
    pub filled_quantity: i64,
    /// Average fill price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_filled_price: Option<Decimal>,
    /// Current order status
    pub status: OrderStatus,
    /// Why the order was rejected, if it was
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    /// When order was created (ms)
    pub created_at: i64,
    /// When order was last updated (ms)
    pub updated_at: i64,
}

impl Order {
    /// Create a new pending order.
    pub fn new(
        account_id: String,
        instrument: Instrument,
        order_type: OrderType,
        side: OrderSide,
        quantity: i64,
        price: Option<Decimal>,
        trigger_price: Option<Decimal>,
    ) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            account_id,
            instrument,
            order_type,
            side,
            quantity,
            price,
            trigger_price,
            filled_quantity: 0,
            avg_filled_price: None,
            status: OrderStatus::Pending,
            rejection_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a new market order.
    pub fn market(
        account_id: String,
        instrument: Instrument,
        side: OrderSide,
        quantity: i64,
    ) -> Self {
        Self::new(
            account_id,
            instrument,
            OrderType::Market,
            side,
            quantity,
            None,
            None,
        )
    }

    /// Create a new limit order.
    pub fn limit(
        account_id: String,
        instrument: Instrument,
        side: OrderSide,
        quantity: i64,
        price: Decimal,
    ) -> Self {
        Self::new(
            account_id,
            instrument,
            OrderType::Limit,
            side,
            quantity,
            Some(price),
            None,
        )
    }

    /// Check if order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.status,
            OrderStatus::Executed | OrderStatus::Rejected | OrderStatus::Cancelled
        )
    }

    /// Check if order can be cancelled.
    pub fn can_cancel(&self) -> bool {
        self.status == OrderStatus::Pending
    }

    /// Mark the order as fully executed at the given price.
    pub fn mark_executed(&mut self, price: Decimal) {
        self.filled_quantity = self.quantity;
        self.avg_filled_price = Some(price);
        self.status = OrderStatus::Executed;
        self.updated_at = chrono::Utc::now().timestamp_millis();
    }

    /// Mark the order as rejected, recording the reason.
    pub fn mark_rejected(&mut self, reason: impl Into<String>) {
        self.status = OrderStatus::Rejected;
        self.rejection_reason = Some(reason.into());
        self.updated_at = chrono::Utc::now().timestamp_millis();
    }
}

// =============================================================================
// Trade
// =============================================================================

/// A completed execution record. Created exactly once per fill and never
/// mutated or deleted afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    /// Unique trade ID
    pub id: String,
    /// Order that generated this trade
    pub order_id: String,
    /// Account this trade belongs to
    pub account_id: String,
    /// Instrument traded
    pub instrument: Instrument,
    /// Buy or sell
    pub side: OrderSide,
    /// Quantity traded
    pub quantity: i64,
    /// Execution price
    pub price: Decimal,
    /// price × quantity
    pub trade_value: Decimal,
    /// Fee charged for this fill
    pub brokerage: Decimal,
    /// Cash delta: trade value plus brokerage for buys, minus for sells
    pub net_value: Decimal,
    /// When the trade executed (ms)
    pub executed_at: i64,
}

impl Trade {
    /// Create a trade record for an executed fill.
    pub fn new(order: &Order, quantity: i64, price: Decimal, brokerage: Decimal) -> Self {
        let trade_value = price * Decimal::from(quantity);
        let net_value = match order.side {
            OrderSide::Buy => trade_value + brokerage,
            OrderSide::Sell => trade_value - brokerage,
        };

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            order_id: order.id.clone(),
            account_id: order.account_id.clone(),
            instrument: order.instrument.clone(),
            side: order.side,
            quantity,
            price,
            trade_value,
            brokerage,
            net_value,
            executed_at: chrono::Utc::now().timestamp_millis(),
        }
    }
}

// =============================================================================
// Watchlist
// =============================================================================

/// A watched symbol within an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistEntry {
    pub account_id: String,
    pub symbol: String,
    /// When the symbol was added (ms)
    pub added_at: i64,
}

// =============================================================================
// Request / Response Types
// =============================================================================

/// Order submission payload.
///
/// Option fields are required iff `instrument_kind` is `Option`; validation
/// happens before anything is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub symbol: String,
    pub instrument_kind: InstrumentKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option_type: Option<OptionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strike: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<NaiveDate>,
    pub order_type: OrderType,
    pub side: OrderSide,
    pub quantity: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_price: Option<Decimal>,
    /// Explicit execution price; skips the live price feed when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_price: Option<Decimal>,
}

impl PlaceOrderRequest {
    /// Convenience constructor for a market order on an equity.
    pub fn market_equity(symbol: impl Into<String>, side: OrderSide, quantity: i64) -> Self {
        Self {
            symbol: symbol.into(),
            instrument_kind: InstrumentKind::Equity,
            option_type: None,
            strike: None,
            expiry: None,
            order_type: OrderType::Market,
            side,
            quantity,
            price: None,
            trigger_price: None,
            execution_price: None,
        }
    }

    /// Set an explicit execution price.
    pub fn at_price(mut self, price: Decimal) -> Self {
        self.execution_price = Some(price);
        self
    }
}

/// Result of an order submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    /// Whether the order reached a healthy state (executed or pending)
    pub success: bool,
    /// Human-readable outcome
    pub message: String,
    /// ID of the persisted order row
    pub order_id: String,
    /// Terminal or pending status of the order
    pub status: OrderStatus,
}

/// Aggregated account view for dashboards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioView {
    pub account_id: String,
    pub balance: Decimal,
    pub invested_amount: Decimal,
    /// balance + Σ(current_price × quantity) over open positions
    pub total_value: Decimal,
    pub total_pnl: Decimal,
    pub day_pnl: Decimal,
    /// Σ unrealized P&L over open positions
    pub unrealized_pnl: Decimal,
    pub open_positions: u32,
}

// =============================================================================
// Price Refresh Sweep
// =============================================================================

/// Outcome of refreshing one position's price.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SweepOutcome {
    /// Price fetched and position updated
    Updated { price: Decimal },
    /// Fetch failed; the stale price was left intact
    Failed { reason: String },
}

/// Per-position record within a sweep report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepItem {
    pub position_id: String,
    pub symbol: String,
    #[serde(flatten)]
    pub outcome: SweepOutcome,
}

/// Report from one price-refresh sweep. A failure for one symbol never
/// aborts the sweep for the others; it is recorded here instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepReport {
    pub updated: u32,
    pub failed: u32,
    pub items: Vec<SweepItem>,
    /// When the sweep ran (ms)
    pub swept_at: i64,
}
