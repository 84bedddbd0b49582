//! Price refresh sweep.
//!
//! Walks an account's open positions, fetches the last traded price for
//! each, and rewrites `current_price` and unrealized P&L. One symbol
//! failing to quote never aborts the sweep for the rest; the failure is
//! recorded in the report and the stale price stays in place.
//!
//! The sweep only ever touches quote columns; quantity, average price,
//! and status belong to order execution.

use crate::services::store::SqliteStore;
use crate::sources::PriceFeed;
use crate::types::{SweepItem, SweepOutcome, SweepReport};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Periodic position price refresher.
pub struct PriceRefresher {
    store: Arc<SqliteStore>,
    feed: Arc<PriceFeed>,
    /// Upper bound on a single quote fetch
    price_timeout: Duration,
}

impl PriceRefresher {
    /// Create a new refresher.
    pub fn new(store: Arc<SqliteStore>, feed: Arc<PriceFeed>, price_timeout: Duration) -> Self {
        Self {
            store,
            feed,
            price_timeout,
        }
    }

    /// Refresh every open position for an account and report per-symbol
    /// outcomes.
    pub async fn refresh_account(&self, account_id: &str) -> SweepReport {
        let positions = self.store.get_open_positions(account_id);
        let mut items = Vec::with_capacity(positions.len());
        let mut updated = 0u32;
        let mut failed = 0u32;

        for mut position in positions {
            let symbol = position.instrument.quote_symbol();

            let outcome = match tokio::time::timeout(
                self.price_timeout,
                self.feed.last_price(&position.instrument),
            )
            .await
            {
                Ok(Ok(price)) => {
                    position.update_price(price);
                    match self.store.update_position_quote(&position) {
                        Ok(()) => {
                            updated += 1;
                            SweepOutcome::Updated { price }
                        }
                        Err(e) => {
                            failed += 1;
                            warn!("Failed to persist quote for {}: {}", symbol, e);
                            SweepOutcome::Failed {
                                reason: e.to_string(),
                            }
                        }
                    }
                }
                Ok(Err(e)) => {
                    failed += 1;
                    debug!("Quote fetch failed for {}: {}", symbol, e);
                    SweepOutcome::Failed {
                        reason: e.to_string(),
                    }
                }
                Err(_) => {
                    failed += 1;
                    warn!("Quote fetch timed out for {}", symbol);
                    SweepOutcome::Failed {
                        reason: format!("quote timed out for {}", symbol),
                    }
                }
            };

            items.push(SweepItem {
                position_id: position.id.clone(),
                symbol,
                outcome,
            });
        }

        debug!(
            "Price sweep for {}: {} updated, {} failed",
            account_id, updated, failed
        );

        SweepReport {
            updated,
            failed,
            items,
            swept_at: chrono::Utc::now().timestamp_millis(),
        }
    }
}
