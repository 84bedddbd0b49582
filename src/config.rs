use crate::services::FeeSchedule;
use rust_decimal::Decimal;
use std::env;
use std::time::Duration;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Path to the SQLite ledger database.
    pub database_path: String,
    /// Account id used when a request names none. The API boundary is the
    /// only place this default applies.
    pub default_account_id: String,
    /// Cash balance granted to an account on first use.
    pub starting_balance: Decimal,
    /// Proportional brokerage rate for equity fills.
    pub equity_brokerage_rate: Decimal,
    /// Cap on the proportional equity brokerage.
    pub equity_brokerage_cap: Decimal,
    /// Flat brokerage per option fill.
    pub option_brokerage_flat: Decimal,
    /// Upper bound on a single price fetch (ms).
    pub price_timeout_ms: u64,
    /// Interval between background price refresh sweeps (seconds).
    pub refresh_interval_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3001),
            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| "folio.db".to_string()),
            default_account_id: env::var("DEFAULT_ACCOUNT_ID")
                .unwrap_or_else(|_| "primary".to_string()),
            starting_balance: env::var("STARTING_BALANCE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(|| Decimal::from(1_000_000)),
            equity_brokerage_rate: env::var("EQUITY_BROKERAGE_RATE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(|| Decimal::new(3, 4)),
            equity_brokerage_cap: env::var("EQUITY_BROKERAGE_CAP")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(|| Decimal::from(20)),
            option_brokerage_flat: env::var("OPTION_BROKERAGE_FLAT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(|| Decimal::from(20)),
            price_timeout_ms: env::var("PRICE_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5_000),
            refresh_interval_secs: env::var("REFRESH_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        }
    }

    /// Fee schedule derived from the configured brokerage knobs.
    pub fn fee_schedule(&self) -> FeeSchedule {
        FeeSchedule {
            equity_rate: self.equity_brokerage_rate,
            equity_fee_cap: self.equity_brokerage_cap,
            option_flat_fee: self.option_brokerage_flat,
        }
    }

    /// Price fetch timeout as a `Duration`.
    pub fn price_timeout(&self) -> Duration {
        Duration::from_millis(self.price_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
