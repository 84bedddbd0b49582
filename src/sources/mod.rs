//! Price sources
//!
//! The ledger treats market data as an opaque collaborator: a feed either
//! returns a last traded price for an instrument or reports it unavailable.
//! Callers bound every fetch with a timeout; a slow source degrades to
//! "unavailable", it never hangs an execution.

pub mod yahoo;

pub use yahoo::YahooQuoteClient;

use crate::types::Instrument;
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::sync::Arc;
use thiserror::Error;

/// Errors from a price feed.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("No price data available for {0}")]
    Unavailable(String),

    #[error("Quote request failed: {0}")]
    Request(String),
}

/// Fixed quote table, used by tests and offline runs.
#[derive(Debug, Default)]
pub struct StaticQuotes {
    quotes: DashMap<String, Decimal>,
}

impl StaticQuotes {
    /// Create an empty quote table.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Set the quote for a symbol.
    pub fn set(&self, symbol: &str, price: Decimal) {
        self.quotes.insert(symbol.to_uppercase(), price);
    }

    /// Remove the quote for a symbol, making it unavailable.
    pub fn clear(&self, symbol: &str) {
        self.quotes.remove(&symbol.to_uppercase());
    }

    fn get(&self, symbol: &str) -> Option<Decimal> {
        self.quotes.get(symbol).map(|entry| *entry.value())
    }
}

/// A last-traded-price feed.
pub enum PriceFeed {
    /// Fixed quotes from a table
    Static(Arc<StaticQuotes>),
    /// Yahoo Finance quote endpoint
    Yahoo(YahooQuoteClient),
}

impl PriceFeed {
    /// Create a static feed backed by the given quote table.
    pub fn fixed(quotes: Arc<StaticQuotes>) -> Self {
        PriceFeed::Static(quotes)
    }

    /// Last traded price for an instrument.
    pub async fn last_price(&self, instrument: &Instrument) -> Result<Decimal, QuoteError> {
        let symbol = instrument.quote_symbol();
        match self {
            PriceFeed::Static(quotes) => quotes
                .get(&symbol)
                .ok_or(QuoteError::Unavailable(symbol)),
            PriceFeed::Yahoo(client) => client.last_price(&symbol).await,
        }
    }
}
