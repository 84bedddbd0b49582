//! Yahoo Finance quote client.
//!
//! Fetches the last traded price for a symbol from the unofficial Yahoo
//! Finance chart API. Requests carry their own timeout so a stalled
//! endpoint reads as "unavailable" rather than blocking an execution.

use super::QuoteError;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    meta: YahooMeta,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooMeta {
    regular_market_price: Option<f64>,
}

/// Normalize symbol for Yahoo Finance.
/// Yahoo uses hyphens instead of dots for share classes (e.g., BRK-B not BRK.B)
fn normalize_yahoo_symbol(symbol: &str) -> String {
    symbol.to_uppercase().replace('.', "-")
}

/// Yahoo Finance quote client.
pub struct YahooQuoteClient {
    client: Client,
}

impl YahooQuoteClient {
    /// Create a new quote client.
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Fetch the last traded price for a symbol.
    pub async fn last_price(&self, symbol: &str) -> Result<Decimal, QuoteError> {
        let yahoo_symbol = normalize_yahoo_symbol(symbol);
        let url = format!(
            "https://query1.finance.yahoo.com/v8/finance/chart/{}?range=1d&interval=1d&includePrePost=false",
            yahoo_symbol
        );

        debug!("Fetching Yahoo quote: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| QuoteError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(QuoteError::Request(format!(
                "HTTP {} for {}",
                response.status(),
                yahoo_symbol
            )));
        }

        let body: YahooChartResponse = response
            .json()
            .await
            .map_err(|e| QuoteError::Request(e.to_string()))?;

        let price = body
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .and_then(|result| result.meta.regular_market_price)
            .ok_or_else(|| QuoteError::Unavailable(symbol.to_string()))?;

        Decimal::from_f64_retain(price)
            .map(|d| d.round_dp(6))
            .ok_or_else(|| QuoteError::Unavailable(symbol.to_string()))
    }
}

impl Default for YahooQuoteClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_normalization() {
        assert_eq!(normalize_yahoo_symbol("brk.b"), "BRK-B");
        assert_eq!(normalize_yahoo_symbol("AAPL"), "AAPL");
    }

    #[test]
    fn test_chart_response_parsing() {
        let json = r#"{
            "chart": {
                "result": [{"meta": {"regularMarketPrice": 187.42}}]
            }
        }"#;

        let parsed: YahooChartResponse = serde_json::from_str(json).unwrap();
        let price = parsed
            .chart
            .result
            .unwrap()
            .into_iter()
            .next()
            .unwrap()
            .meta
            .regular_market_price;
        assert_eq!(price, Some(187.42));
    }
}
