//! SQLite persistence layer for the trading ledger.
//!
//! Owns the relational tables for accounts, positions, orders, trades, and
//! watchlists. Monetary columns are stored as TEXT holding canonical
//! decimal strings (never binary floats) so repeated average-price
//! recomputation cannot accumulate rounding drift.
//!
//! One order execution (account delta + position change + order terminal
//! state + trade insert) is applied through [`SqliteStore::apply_execution`]
//! inside a single transaction; readers observe either the pre- or
//! post-execution state, never a partial write.

use crate::types::{
    Account, Instrument, Order, OrderSide, OrderStatus, OrderType, Position, PositionStatus,
    Trade, WatchlistEntry,
};
use rusqlite::{params, Connection, Row};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use std::sync::Mutex;
use tracing::{debug, error, info};

/// SQLite store for ledger data.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Create a new SQLite store at the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        info!("SQLite store initialized");
        Ok(store)
    }

    /// Create an in-memory SQLite store (for testing).
    pub fn new_in_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        debug!("In-memory SQLite store initialized");
        Ok(store)
    }

    /// Initialize database schema.
    fn init_schema(&self) -> Result<(), rusqlite::Error> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "CREATE TABLE IF NOT EXISTS accounts (
                id TEXT PRIMARY KEY,
                balance TEXT NOT NULL,
                invested_amount TEXT NOT NULL,
                total_pnl TEXT NOT NULL,
                day_pnl TEXT NOT NULL,
                day_anchor TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS positions (
                id TEXT PRIMARY KEY,
                account_id TEXT NOT NULL,
                position_key TEXT NOT NULL,
                instrument_json TEXT NOT NULL,
                quantity INTEGER NOT NULL,
                avg_price TEXT NOT NULL,
                current_price TEXT NOT NULL,
                pnl TEXT NOT NULL,
                pnl_percent TEXT NOT NULL,
                status TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            )",
            [],
        )?;

        // At most one open position per instrument within an account
        conn.execute(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_positions_open_key
             ON positions(account_id, position_key) WHERE status = 'open'",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS orders (
                id TEXT PRIMARY KEY,
                account_id TEXT NOT NULL,
                instrument_json TEXT NOT NULL,
                order_type TEXT NOT NULL,
                side TEXT NOT NULL,
                quantity INTEGER NOT NULL,
                price TEXT,
                trigger_price TEXT,
                filled_quantity INTEGER NOT NULL,
                avg_filled_price TEXT,
                status TEXT NOT NULL,
                rejection_reason TEXT,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_orders_account
             ON orders(account_id, created_at DESC)",
            [],
        )?;

        // Trades are append-only: insert and select, nothing else
        conn.execute(
            "CREATE TABLE IF NOT EXISTS trades (
                id TEXT PRIMARY KEY,
                order_id TEXT NOT NULL,
                account_id TEXT NOT NULL,
                instrument_json TEXT NOT NULL,
                side TEXT NOT NULL,
                quantity INTEGER NOT NULL,
                price TEXT NOT NULL,
                trade_value TEXT NOT NULL,
                brokerage TEXT NOT NULL,
                net_value TEXT NOT NULL,
                executed_at INTEGER NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_trades_account
             ON trades(account_id, executed_at DESC)",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS watchlist (
                account_id TEXT NOT NULL,
                symbol TEXT NOT NULL,
                added_at INTEGER NOT NULL,
                PRIMARY KEY (account_id, symbol)
            )",
            [],
        )?;

        info!("SQLite schema initialized");
        Ok(())
    }

    // ========== Account Methods ==========

    /// Get an account by ID.
    pub fn get_account(&self, id: &str) -> Option<Account> {
        let conn = self.conn.lock().unwrap();

        let result = conn.query_row(
            "SELECT id, balance, invested_amount, total_pnl, day_pnl, day_anchor,
                    created_at, updated_at
             FROM accounts WHERE id = ?1",
            params![id],
            row_to_account,
        );

        match result {
            Ok(account) => Some(account),
            Err(rusqlite::Error::QueryReturnedNoRows) => None,
            Err(e) => {
                error!("Error fetching account {}: {}", id, e);
                None
            }
        }
    }

    /// Insert a new account row.
    pub fn create_account(&self, account: &Account) -> Result<(), rusqlite::Error> {
        let conn = self.conn.lock().unwrap();
        insert_account(&conn, account)?;
        debug!("Created account {}", account.id);
        Ok(())
    }

    // ========== Order Methods ==========

    /// Persist a new order.
    pub fn create_order(&self, order: &Order) -> Result<(), rusqlite::Error> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO orders
             (id, account_id, instrument_json, order_type, side, quantity, price,
              trigger_price, filled_quantity, avg_filled_price, status,
              rejection_reason, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            params![
                order.id,
                order.account_id,
                instrument_json(&order.instrument),
                order.order_type.to_string(),
                order.side.to_string(),
                order.quantity,
                order.price.map(|p| p.to_string()),
                order.trigger_price.map(|p| p.to_string()),
                order.filled_quantity,
                order.avg_filled_price.map(|p| p.to_string()),
                order.status.to_string(),
                order.rejection_reason,
                order.created_at,
                order.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Update an existing order's mutable fields.
    pub fn update_order(&self, order: &Order) -> Result<(), rusqlite::Error> {
        let conn = self.conn.lock().unwrap();
        update_order_row(&conn, order)
    }

    /// Get an order by ID.
    pub fn get_order(&self, id: &str) -> Option<Order> {
        let conn = self.conn.lock().unwrap();

        let result = conn.query_row(
            "SELECT id, account_id, instrument_json, order_type, side, quantity, price,
                    trigger_price, filled_quantity, avg_filled_price, status,
                    rejection_reason, created_at, updated_at
             FROM orders WHERE id = ?1",
            params![id],
            row_to_order,
        );

        match result {
            Ok(order) => Some(order),
            Err(rusqlite::Error::QueryReturnedNoRows) => None,
            Err(e) => {
                error!("Error fetching order {}: {}", id, e);
                None
            }
        }
    }

    /// Get recent orders for an account, newest first.
    pub fn get_account_orders(&self, account_id: &str, limit: usize) -> Vec<Order> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = match conn.prepare(
            "SELECT id, account_id, instrument_json, order_type, side, quantity, price,
                    trigger_price, filled_quantity, avg_filled_price, status,
                    rejection_reason, created_at, updated_at
             FROM orders WHERE account_id = ?1
             ORDER BY created_at DESC
             LIMIT ?2",
        ) {
            Ok(stmt) => stmt,
            Err(e) => {
                error!("Error preparing order query: {}", e);
                return Vec::new();
            }
        };

        stmt.query_map(params![account_id, limit as i64], row_to_order)
            .map(|rows| rows.filter_map(|r| r.ok()).collect())
            .unwrap_or_default()
    }

    // ========== Position Methods ==========

    /// Get the open position for an instrument key, if any.
    pub fn get_open_position(&self, account_id: &str, position_key: &str) -> Option<Position> {
        let conn = self.conn.lock().unwrap();

        let result = conn.query_row(
            "SELECT id, account_id, instrument_json, quantity, avg_price, current_price,
                    pnl, pnl_percent, status, created_at, updated_at
             FROM positions
             WHERE account_id = ?1 AND position_key = ?2 AND status = 'open'",
            params![account_id, position_key],
            row_to_position,
        );

        match result {
            Ok(position) => Some(position),
            Err(rusqlite::Error::QueryReturnedNoRows) => None,
            Err(e) => {
                error!("Error fetching position {}: {}", position_key, e);
                None
            }
        }
    }

    /// Get all open positions for an account.
    pub fn get_open_positions(&self, account_id: &str) -> Vec<Position> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = match conn.prepare(
            "SELECT id, account_id, instrument_json, quantity, avg_price, current_price,
                    pnl, pnl_percent, status, created_at, updated_at
             FROM positions
             WHERE account_id = ?1 AND status = 'open'
             ORDER BY created_at ASC",
        ) {
            Ok(stmt) => stmt,
            Err(e) => {
                error!("Error preparing position query: {}", e);
                return Vec::new();
            }
        };

        stmt.query_map(params![account_id], row_to_position)
            .map(|rows| rows.filter_map(|r| r.ok()).collect())
            .unwrap_or_default()
    }

    /// Persist a quote refresh: current price and unrealized P&L only.
    /// Quantity, average price, and status never change here.
    pub fn update_position_quote(&self, position: &Position) -> Result<(), rusqlite::Error> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE positions
             SET current_price = ?1, pnl = ?2, pnl_percent = ?3, updated_at = ?4
             WHERE id = ?5 AND status = 'open'",
            params![
                position.current_price.to_string(),
                position.pnl.to_string(),
                position.pnl_percent.to_string(),
                position.updated_at,
                position.id,
            ],
        )?;
        Ok(())
    }

    // ========== Trade Methods ==========

    /// Get recent trades for an account, newest first.
    pub fn get_account_trades(&self, account_id: &str, limit: usize) -> Vec<Trade> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = match conn.prepare(
            "SELECT id, order_id, account_id, instrument_json, side, quantity, price,
                    trade_value, brokerage, net_value, executed_at
             FROM trades WHERE account_id = ?1
             ORDER BY executed_at DESC
             LIMIT ?2",
        ) {
            Ok(stmt) => stmt,
            Err(e) => {
                error!("Error preparing trade query: {}", e);
                return Vec::new();
            }
        };

        stmt.query_map(params![account_id, limit as i64], row_to_trade)
            .map(|rows| rows.filter_map(|r| r.ok()).collect())
            .unwrap_or_default()
    }

    // ========== Execution ==========

    /// Apply one order execution atomically: account state, position state,
    /// order terminal state, and the trade record commit together or not
    /// at all.
    pub fn apply_execution(
        &self,
        account: &Account,
        position: &Position,
        order: &Order,
        trade: &Trade,
    ) -> Result<(), rusqlite::Error> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        upsert_account(&tx, account)?;
        upsert_position(&tx, position)?;
        update_order_row(&tx, order)?;
        insert_trade(&tx, trade)?;

        tx.commit()
    }

    // ========== Watchlist Methods ==========

    /// Get the watchlist for an account.
    pub fn get_watchlist(&self, account_id: &str) -> Vec<WatchlistEntry> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = match conn.prepare(
            "SELECT account_id, symbol, added_at
             FROM watchlist WHERE account_id = ?1
             ORDER BY added_at ASC",
        ) {
            Ok(stmt) => stmt,
            Err(e) => {
                error!("Error preparing watchlist query: {}", e);
                return Vec::new();
            }
        };

        stmt.query_map(params![account_id], |row| {
            Ok(WatchlistEntry {
                account_id: row.get(0)?,
                symbol: row.get(1)?,
                added_at: row.get(2)?,
            })
        })
        .map(|rows| rows.filter_map(|r| r.ok()).collect())
        .unwrap_or_default()
    }

    /// Add a symbol to the watchlist. Returns false if it was already there.
    pub fn add_to_watchlist(&self, account_id: &str, symbol: &str) -> Result<bool, rusqlite::Error> {
        let conn = self.conn.lock().unwrap();
        let now = chrono::Utc::now().timestamp_millis();

        let inserted = conn.execute(
            "INSERT OR IGNORE INTO watchlist (account_id, symbol, added_at)
             VALUES (?1, ?2, ?3)",
            params![account_id, symbol.to_uppercase(), now],
        )?;

        Ok(inserted > 0)
    }
}

// =============================================================================
// Row mapping and SQL helpers
// =============================================================================

fn instrument_json(instrument: &Instrument) -> String {
    serde_json::to_string(instrument).unwrap_or_default()
}

fn parse_instrument(idx: usize, json: &str) -> rusqlite::Result<Instrument> {
    serde_json::from_str(json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn parse_decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap_or(Decimal::ZERO)
}

fn parse_side(s: &str) -> OrderSide {
    match s {
        "sell" => OrderSide::Sell,
        _ => OrderSide::Buy,
    }
}

fn parse_order_type(s: &str) -> OrderType {
    match s {
        "limit" => OrderType::Limit,
        "stop_loss" => OrderType::StopLoss,
        "stop_loss_market" => OrderType::StopLossMarket,
        _ => OrderType::Market,
    }
}

fn parse_order_status(s: &str) -> OrderStatus {
    match s {
        "executed" => OrderStatus::Executed,
        "rejected" => OrderStatus::Rejected,
        "cancelled" => OrderStatus::Cancelled,
        _ => OrderStatus::Pending,
    }
}

fn parse_position_status(s: &str) -> PositionStatus {
    match s {
        "closed" => PositionStatus::Closed,
        _ => PositionStatus::Open,
    }
}

fn row_to_account(row: &Row<'_>) -> rusqlite::Result<Account> {
    let anchor: String = row.get(5)?;
    Ok(Account {
        id: row.get(0)?,
        balance: parse_decimal(&row.get::<_, String>(1)?),
        invested_amount: parse_decimal(&row.get::<_, String>(2)?),
        total_pnl: parse_decimal(&row.get::<_, String>(3)?),
        day_pnl: parse_decimal(&row.get::<_, String>(4)?),
        day_anchor: anchor
            .parse()
            .unwrap_or_else(|_| chrono::Utc::now().date_naive()),
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

fn row_to_position(row: &Row<'_>) -> rusqlite::Result<Position> {
    let json: String = row.get(2)?;
    Ok(Position {
        id: row.get(0)?,
        account_id: row.get(1)?,
        instrument: parse_instrument(2, &json)?,
        quantity: row.get(3)?,
        avg_price: parse_decimal(&row.get::<_, String>(4)?),
        current_price: parse_decimal(&row.get::<_, String>(5)?),
        pnl: parse_decimal(&row.get::<_, String>(6)?),
        pnl_percent: parse_decimal(&row.get::<_, String>(7)?),
        status: parse_position_status(&row.get::<_, String>(8)?),
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

fn row_to_order(row: &Row<'_>) -> rusqlite::Result<Order> {
    let json: String = row.get(2)?;
    Ok(Order {
        id: row.get(0)?,
        account_id: row.get(1)?,
        instrument: parse_instrument(2, &json)?,
        order_type: parse_order_type(&row.get::<_, String>(3)?),
        side: parse_side(&row.get::<_, String>(4)?),
        quantity: row.get(5)?,
        price: row.get::<_, Option<String>>(6)?.map(|s| parse_decimal(&s)),
        trigger_price: row.get::<_, Option<String>>(7)?.map(|s| parse_decimal(&s)),
        filled_quantity: row.get(8)?,
        avg_filled_price: row.get::<_, Option<String>>(9)?.map(|s| parse_decimal(&s)),
        status: parse_order_status(&row.get::<_, String>(10)?),
        rejection_reason: row.get(11)?,
        created_at: row.get(12)?,
        updated_at: row.get(13)?,
    })
}

fn row_to_trade(row: &Row<'_>) -> rusqlite::Result<Trade> {
    let json: String = row.get(3)?;
    Ok(Trade {
        id: row.get(0)?,
        order_id: row.get(1)?,
        account_id: row.get(2)?,
        instrument: parse_instrument(3, &json)?,
        side: parse_side(&row.get::<_, String>(4)?),
        quantity: row.get(5)?,
        price: parse_decimal(&row.get::<_, String>(6)?),
        trade_value: parse_decimal(&row.get::<_, String>(7)?),
        brokerage: parse_decimal(&row.get::<_, String>(8)?),
        net_value: parse_decimal(&row.get::<_, String>(9)?),
        executed_at: row.get(10)?,
    })
}

fn insert_account(conn: &Connection, account: &Account) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT INTO accounts
         (id, balance, invested_amount, total_pnl, day_pnl, day_anchor,
          created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            account.id,
            account.balance.to_string(),
            account.invested_amount.to_string(),
            account.total_pnl.to_string(),
            account.day_pnl.to_string(),
            account.day_anchor.to_string(),
            account.created_at,
            account.updated_at,
        ],
    )?;
    Ok(())
}

fn upsert_account(conn: &Connection, account: &Account) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT INTO accounts
         (id, balance, invested_amount, total_pnl, day_pnl, day_anchor,
          created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         ON CONFLICT(id) DO UPDATE SET
            balance = excluded.balance,
            invested_amount = excluded.invested_amount,
            total_pnl = excluded.total_pnl,
            day_pnl = excluded.day_pnl,
            day_anchor = excluded.day_anchor,
            updated_at = excluded.updated_at",
        params![
            account.id,
            account.balance.to_string(),
            account.invested_amount.to_string(),
            account.total_pnl.to_string(),
            account.day_pnl.to_string(),
            account.day_anchor.to_string(),
            account.created_at,
            account.updated_at,
        ],
    )?;
    Ok(())
}

fn upsert_position(conn: &Connection, position: &Position) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT INTO positions
         (id, account_id, position_key, instrument_json, quantity, avg_price,
          current_price, pnl, pnl_percent, status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
         ON CONFLICT(id) DO UPDATE SET
            quantity = excluded.quantity,
            avg_price = excluded.avg_price,
            current_price = excluded.current_price,
            pnl = excluded.pnl,
            pnl_percent = excluded.pnl_percent,
            status = excluded.status,
            updated_at = excluded.updated_at",
        params![
            position.id,
            position.account_id,
            position.instrument.position_key(),
            instrument_json(&position.instrument),
            position.quantity,
            position.avg_price.to_string(),
            position.current_price.to_string(),
            position.pnl.to_string(),
            position.pnl_percent.to_string(),
            position.status.to_string(),
            position.created_at,
            position.updated_at,
        ],
    )?;
    Ok(())
}

fn update_order_row(conn: &Connection, order: &Order) -> Result<(), rusqlite::Error> {
    conn.execute(
        "UPDATE orders
         SET filled_quantity = ?1, avg_filled_price = ?2, status = ?3,
             rejection_reason = ?4, updated_at = ?5
         WHERE id = ?6",
        params![
            order.filled_quantity,
            order.avg_filled_price.map(|p| p.to_string()),
            order.status.to_string(),
            order.rejection_reason,
            order.updated_at,
            order.id,
        ],
    )?;
    Ok(())
}

fn insert_trade(conn: &Connection, trade: &Trade) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT INTO trades
         (id, order_id, account_id, instrument_json, side, quantity, price,
          trade_value, brokerage, net_value, executed_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            trade.id,
            trade.order_id,
            trade.account_id,
            instrument_json(&trade.instrument),
            trade.side.to_string(),
            trade.quantity,
            trade.price.to_string(),
            trade.trade_value.to_string(),
            trade.brokerage.to_string(),
            trade.net_value.to_string(),
            trade.executed_at,
        ],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PlaceOrderRequest;

    #[test]
    fn test_account_crud() {
        let store = SqliteStore::new_in_memory().unwrap();

        let account = Account::new("acct-1".to_string(), Decimal::from(1_000_000));
        store.create_account(&account).unwrap();

        let loaded = store.get_account("acct-1").unwrap();
        assert_eq!(loaded.id, "acct-1");
        assert_eq!(loaded.balance, Decimal::from(1_000_000));
        assert_eq!(loaded.invested_amount, Decimal::ZERO);

        assert!(store.get_account("missing").is_none());
    }

    #[test]
    fn test_order_round_trip() {
        let store = SqliteStore::new_in_memory().unwrap();

        let request = PlaceOrderRequest::market_equity("aapl", OrderSide::Buy, 10);
        let order = Order::market(
            "acct-1".to_string(),
            Instrument::Equity {
                symbol: request.symbol.clone(),
            },
            request.side,
            request.quantity,
        );
        store.create_order(&order).unwrap();

        let loaded = store.get_order(&order.id).unwrap();
        assert_eq!(loaded.status, OrderStatus::Pending);
        assert_eq!(loaded.quantity, 10);
        assert_eq!(loaded.instrument.symbol(), "aapl");

        let orders = store.get_account_orders("acct-1", 10);
        assert_eq!(orders.len(), 1);
    }

    #[test]
    fn test_open_position_lookup_excludes_closed() {
        let store = SqliteStore::new_in_memory().unwrap();

        let instrument = Instrument::Equity {
            symbol: "TCS".to_string(),
        };
        let mut position = Position::new(
            "acct-1".to_string(),
            instrument.clone(),
            10,
            Decimal::from(100),
        );

        let account = Account::new("acct-1".to_string(), Decimal::from(1_000_000));
        let order = Order::market("acct-1".to_string(), instrument.clone(), OrderSide::Buy, 10);
        let trade = Trade::new(&order, 10, Decimal::from(100), Decimal::ZERO);
        store
            .apply_execution(&account, &position, &order, &trade)
            .unwrap();

        assert!(store
            .get_open_position("acct-1", &instrument.position_key())
            .is_some());

        position.quantity = 0;
        position.status = PositionStatus::Closed;
        store
            .apply_execution(&account, &position, &order, &trade)
            .unwrap_err();
        // duplicate trade id rolls the whole transaction back
        assert!(store
            .get_open_position("acct-1", &instrument.position_key())
            .is_some());

        let trade2 = Trade::new(&order, 10, Decimal::from(100), Decimal::ZERO);
        store
            .apply_execution(&account, &position, &order, &trade2)
            .unwrap();
        assert!(store
            .get_open_position("acct-1", &instrument.position_key())
            .is_none());
        assert!(store.get_open_positions("acct-1").is_empty());
    }

    #[test]
    fn test_watchlist_deduplicates() {
        let store = SqliteStore::new_in_memory().unwrap();

        assert!(store.add_to_watchlist("acct-1", "infy").unwrap());
        assert!(!store.add_to_watchlist("acct-1", "INFY").unwrap());

        let watchlist = store.get_watchlist("acct-1");
        assert_eq!(watchlist.len(), 1);
        assert_eq!(watchlist[0].symbol, "INFY");
    }
}
