use anyhow::Context;
use axum::Router;
use folio::config::Config;
use folio::services::{BrokerageCalculator, OrderManager, PriceRefresher, SqliteStore};
use folio::sources::{PriceFeed, YahooQuoteClient};
use folio::{api, AppState};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env());
    info!("Starting folio server on {}:{}", config.host, config.port);

    // Open the ledger database
    let store = Arc::new(
        SqliteStore::new(&config.database_path).context("opening ledger database")?,
    );

    // Live quote feed
    let feed = Arc::new(PriceFeed::Yahoo(YahooQuoteClient::new()));

    let orders = Arc::new(OrderManager::new(
        store.clone(),
        feed.clone(),
        BrokerageCalculator::new(config.fee_schedule()),
        config.starting_balance,
        config.price_timeout(),
    ));
    let refresher = Arc::new(PriceRefresher::new(store, feed, config.price_timeout()));

    // Background price refresh for the default account
    {
        let refresher = refresher.clone();
        let account_id = config.default_account_id.clone();
        let interval_secs = config.refresh_interval_secs;
        tokio::spawn(async move {
            let mut ticker =
                tokio::time::interval(std::time::Duration::from_secs(interval_secs.max(1)));
            loop {
                ticker.tick().await;
                let report = refresher.refresh_account(&account_id).await;
                if report.failed > 0 {
                    warn!(
                        "Price sweep: {} updated, {} failed",
                        report.updated, report.failed
                    );
                }
            }
        });
    }

    let state = AppState {
        config: config.clone(),
        orders,
        refresher,
    };

    let app = Router::new()
        .merge(api::router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("binding server address")?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
