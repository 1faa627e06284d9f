//! Test utilities for API server integration tests

use axum_test::TestServer;
use chrono::{Duration, NaiveDate};
use stockking::core::http::{create_router, AppState, HealthStatus};
use stockking::metrics::Metrics;
use stockking::models::stock::{PriceBar, PriceHistory, Quote, SeriesOrder};
use stockking::services::market_data::InMemoryMarketDataProvider;
use stockking::signals::engine::AnalysisEngine;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

pub fn history(symbol: &str, count: usize, start: f64, step: f64) -> PriceHistory {
    let first_day = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
    let bars = (0..count)
        .map(|i| {
            let close = start + step * i as f64;
            PriceBar::new(
                first_day + Duration::days(i as i64),
                close,
                close + 1.0,
                close - 1.0,
                close,
                1_000_000,
            )
        })
        .collect();
    PriceHistory::new(symbol, SeriesOrder::OldestFirst, bars)
}

pub fn quote(symbol: &str, price: f64) -> Quote {
    Quote {
        symbol: symbol.to_string(),
        price,
        volume: 52_000_000,
        latest_trading_day: NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date"),
        open: price - 1.0,
        high: price + 1.0,
        low: price - 2.0,
        previous_close: price - 0.5,
        change: 0.5,
        change_percent: 0.3,
    }
}

/// Test helper for API server integration tests
#[allow(dead_code)]
pub struct TestApiServer {
    pub server: TestServer,
    pub metrics: Arc<Metrics>,
    pub provider: Arc<InMemoryMarketDataProvider>,
}

impl TestApiServer {
    /// Server without a database. AAPL rises, TSLA falls, KO is flat and
    /// SHORT has too little history for a full analysis.
    pub async fn new() -> Self {
        let provider = Arc::new(InMemoryMarketDataProvider::new());
        provider.insert_history(history("AAPL", 60, 100.0, 1.0)).await;
        provider.insert_history(history("TSLA", 60, 200.0, -1.0)).await;
        provider.insert_history(history("KO", 60, 75.0, 0.0)).await;
        provider.insert_history(history("SHORT", 30, 10.0, 1.0)).await;
        provider.insert_quote(quote("AAPL", 159.0)).await;

        let metrics = Arc::new(Metrics::new().expect("metrics initialization"));
        let engine = AnalysisEngine::new(provider.clone()).with_metrics(metrics.clone());

        let state = AppState {
            health: Arc::new(RwLock::new(HealthStatus::default())),
            metrics: metrics.clone(),
            start_time: Arc::new(Instant::now()),
            engine: Arc::new(engine),
            database: None,
            refresher: None,
            popular_symbols: Arc::new(vec![
                "KO".to_string(),
                "TSLA".to_string(),
                "AAPL".to_string(),
                "SHORT".to_string(),
            ]),
        };

        let app = create_router(state);
        let server = TestServer::new(app).expect("start test server");

        Self {
            server,
            metrics,
            provider,
        }
    }
}
