pub mod brokerage;
pub mod ledger;
pub mod orders;
pub mod refresh;
pub mod store;

pub use brokerage::{BrokerageCalculator, FeeSchedule};
pub use ledger::{apply_fill, FillEffect};
pub use orders::{OrderManager, TradingError};
pub use refresh::PriceRefresher;
pub use store::SqliteStore;
