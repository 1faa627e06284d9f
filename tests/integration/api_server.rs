//! Integration tests for the API Server
//!
//! Tests HTTP endpoints, health checks, metrics, and analysis routes.

#[path = "api_server/test_utils.rs"]
mod test_utils;

use serde_json::{json, Value};

use test_utils::TestApiServer;

#[tokio::test]
async fn health_endpoint_reports_healthy_status() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["uptime_seconds"].as_u64().is_some());
    assert_eq!(body["service"], "stockking-api");
    assert_eq!(body["database"], false);
}

#[tokio::test]
async fn metrics_endpoint_exposes_prometheus_metrics() {
    let app = TestApiServer::new().await;
    let _ = app.server.get("/api/stocks/analysis/AAPL").await;

    let response = app.server.get("/metrics").await;
    assert_eq!(response.status_code(), 200);

    let body = response.text();
    assert!(body.contains("http_requests_total"));
    assert!(body.contains("http_request_duration_seconds"));
    assert!(body.contains("http_requests_in_flight"));
    assert!(body.contains("analyses_total 1"));
}

#[tokio::test]
async fn analysis_endpoint_returns_composite_analysis() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/api/stocks/analysis/aapl").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["symbol"], "AAPL");
    assert_eq!(body["overallSignal"], "BUY");
    assert_eq!(body["overallConfidence"], 71);

    let indicators = body["indicators"].as_array().expect("indicators array");
    let names: Vec<&str> = indicators
        .iter()
        .filter_map(|i| i["indicator"].as_str())
        .collect();
    assert_eq!(names, vec!["SMA20", "SMA50", "EMA12", "RSI14"]);
}

#[tokio::test]
async fn analysis_with_short_history_is_unprocessable() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/api/stocks/analysis/SHORT").await;
    assert_eq!(response.status_code(), 422);

    let body: Value = response.json();
    assert_eq!(body["error"], "Failed to get technical analysis");
    let message = body["message"].as_str().unwrap_or_default();
    assert!(message.contains("need at least 50"), "unexpected message: {}", message);
}

#[tokio::test]
async fn analysis_of_unknown_symbol_is_unprocessable() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/api/stocks/analysis/UNKNOWN").await;
    assert_eq!(response.status_code(), 422);
}

#[tokio::test]
async fn indicator_endpoint_uses_default_period() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/api/stocks/indicators/AAPL/rsi").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["symbol"], "AAPL");
    assert_eq!(body["indicator"]["indicator"], "RSI14");
    assert_eq!(body["indicator"]["period"], 14);
    assert_eq!(body["indicator"]["signal"], "SELL");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn indicator_endpoint_honors_period_query() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .get("/api/stocks/indicators/SHORT/SMA")
        .add_query_param("period", 5)
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["indicator"]["indicator"], "SMA5");
    assert_eq!(body["indicator"]["values"].as_array().map(Vec::len), Some(26));
}

#[tokio::test]
async fn indicator_endpoint_rejects_unknown_indicator() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/api/stocks/indicators/AAPL/macd").await;
    assert_eq!(response.status_code(), 400);

    let body: Value = response.json();
    assert_eq!(body["error"], "Unsupported indicator");
    assert!(body["message"]
        .as_str()
        .unwrap_or_default()
        .contains("Available: sma, ema, rsi"));
}

#[tokio::test]
async fn indicator_endpoint_reports_insufficient_data() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .get("/api/stocks/indicators/SHORT/ema")
        .add_query_param("period", 40)
        .await;
    assert_eq!(response.status_code(), 422);
}

#[tokio::test]
async fn top_signals_sorted_by_confidence() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/api/stocks/signals/top").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    // SHORT fails analysis and is left out.
    assert_eq!(body["totalAnalyzed"], 3);
    let ranked: Vec<&str> = body["signals"]
        .as_array()
        .expect("signals array")
        .iter()
        .filter_map(|s| s["symbol"].as_str())
        .collect();
    assert_eq!(ranked, vec!["AAPL", "TSLA", "KO"]);
    assert_eq!(body["signals"][0]["buySignals"], 3);
    assert_eq!(body["signals"][0]["indicatorCount"], 4);
}

#[tokio::test]
async fn top_signals_respects_limit() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .get("/api/stocks/signals/top")
        .add_query_param("limit", 1)
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["totalAnalyzed"], 1);
    assert_eq!(body["signals"][0]["symbol"], "KO");
}

#[tokio::test]
async fn price_endpoint_returns_quote() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/api/stocks/price/aapl").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["price_data"]["symbol"], "AAPL");
    assert_eq!(body["price_data"]["price"], 159.0);
    assert_eq!(body["price_data"]["latestTradingDay"], "2024-03-01");
}

#[tokio::test]
async fn price_endpoint_unknown_symbol_is_not_found() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/api/stocks/price/NOPE").await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn search_endpoint_returns_matches() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/api/stocks/search/aap").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["results"][0]["symbol"], "AAPL");
}

#[tokio::test]
async fn database_routes_unavailable_without_database() {
    let app = TestApiServer::new().await;

    for path in [
        "/api/stocks/history/AAPL",
        "/api/stocks/stats/AAPL",
        "/api/stocks/user/1",
        "/api/signals/user/1",
        "/api/signals/stock/AAPL",
        "/api/signals/stats/1",
    ] {
        let response = app.server.get(path).await;
        assert_eq!(response.status_code(), 503, "{} should be unavailable", path);
    }

    let response = app.server.post("/api/stocks/update-all").await;
    assert_eq!(response.status_code(), 503);

    let response = app.server.delete("/api/stocks/7").await;
    assert_eq!(response.status_code(), 503);
}

#[tokio::test]
async fn track_requires_user_and_symbol() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .post("/api/stocks/track")
        .json(&json!({ "userId": 1 }))
        .await;
    assert_eq!(response.status_code(), 400);

    let body: Value = response.json();
    assert_eq!(body["error"], "User ID and symbol are required");

    let response = app
        .server
        .post("/api/stocks/track")
        .json(&json!({ "userId": 1, "symbol": "AAPL" }))
        .await;
    assert_eq!(response.status_code(), 503);
}

#[tokio::test]
async fn create_signal_validates_payload() {
    let app = TestApiServer::new().await;

    let response = app
        .server
        .post("/api/signals")
        .json(&json!({ "stockId": 1, "signalType": "BUY" }))
        .await;
    assert_eq!(response.status_code(), 400);

    let response = app
        .server
        .post("/api/signals")
        .json(&json!({
            "stockId": 1,
            "signalType": "MAYBE",
            "confidence": 70,
            "priceAtSignal": 101.5
        }))
        .await;
    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"], "Invalid signal type");

    let response = app
        .server
        .post("/api/signals")
        .json(&json!({
            "stockId": 1,
            "signalType": "buy",
            "confidence": 70,
            "priceAtSignal": 101.5,
            "indicatorData": { "rsi": 28.1 }
        }))
        .await;
    assert_eq!(response.status_code(), 503);
}
