//! HTTP endpoint server using Axum

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, warn, Level};

use crate::config::Config;
use crate::core::routes::{signals, stocks};
use crate::core::scheduler::PriceRefresher;
use crate::db::{DatabaseError, StockDatabase};
use crate::metrics::Metrics;
use crate::services::alpha_vantage::AlphaVantageProvider;
use crate::services::market_data::MarketDataProvider;
use crate::signals::engine::AnalysisEngine;

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub engine: Arc<AnalysisEngine>,
    pub database: Option<Arc<StockDatabase>>,
    pub refresher: Option<Arc<PriceRefresher>>,
    pub popular_symbols: Arc<Vec<String>>,
}

impl AppState {
    pub fn provider(&self) -> &Arc<dyn MarketDataProvider + Send + Sync> {
        self.engine.provider()
    }

    pub fn database(&self) -> Result<&Arc<StockDatabase>, ApiError> {
        self.database.as_ref().ok_or_else(ApiError::database_unavailable)
    }
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

/// Error response carrying a status and a JSON `{ error, message }` body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub message: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            message: None,
        }
    }

    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    pub fn not_found(error: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, error)
    }

    pub fn database_unavailable() -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, "Database is not configured")
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.message {
            Some(message) => json!({ "error": self.error, "message": message }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<DatabaseError> for ApiError {
    fn from(e: DatabaseError) -> Self {
        match e {
            DatabaseError::NotFound(what) => ApiError::not_found(format!("{} not found", what)),
            DatabaseError::Conflict(message) => ApiError::new(StatusCode::CONFLICT, message),
            other => {
                tracing::error!(error = %other, "Database operation failed");
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Database operation failed")
            }
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": "stockking-api",
        "database": state.database.is_some(),
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();
    state.metrics.http_requests_in_flight.dec();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        // Technical analysis
        .route("/api/stocks/analysis/{symbol}", get(stocks::get_analysis))
        .route(
            "/api/stocks/indicators/{symbol}/{indicator}",
            get(stocks::get_indicator),
        )
        .route("/api/stocks/signals/top", get(stocks::get_top_signals))
        // Market data
        .route("/api/stocks/price/{symbol}", get(stocks::get_price))
        .route("/api/stocks/history/{symbol}", get(stocks::get_history))
        .route("/api/stocks/search/{query}", get(stocks::search))
        .route("/api/stocks/stats/{symbol}", get(stocks::get_stats))
        // Tracking
        .route("/api/stocks/user/{user_id}", get(stocks::list_tracked))
        .route("/api/stocks/track", post(stocks::track))
        .route("/api/stocks/update-all", post(stocks::update_all))
        .route("/api/stocks/{stock_id}", delete(stocks::untrack))
        // Stored signals
        .route("/api/signals", post(signals::create_signal))
        .route("/api/signals/user/{user_id}", get(signals::list_for_user))
        .route("/api/signals/stock/{symbol}", get(signals::list_for_symbol))
        .route("/api/signals/stats/{user_id}", get(signals::stats_for_user))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Wire up provider, database, analysis engine and refresher from `config`.
pub async fn build_state(config: &Config) -> Result<AppState, Box<dyn std::error::Error>> {
    let metrics = Arc::new(Metrics::new()?);

    let provider: Arc<dyn MarketDataProvider + Send + Sync> = Arc::new(AlphaVantageProvider::with_client(
        config.alpha_vantage_base_url.clone(),
        config.alpha_vantage_api_key.clone(),
        reqwest::Client::new(),
    )?);

    // Tracking and stored-signal endpoints need the database; analysis does not.
    let database = match config.database_url.as_deref() {
        Some(url) => match StockDatabase::connect(url).await {
            Ok(db) => {
                info!("PostgreSQL connected for API server");
                Some(Arc::new(db))
            }
            Err(e) => {
                warn!(error = %e, "Failed to connect to PostgreSQL - tracking endpoints will be unavailable");
                None
            }
        },
        None => {
            warn!("DATABASE_URL not set - tracking endpoints will be unavailable");
            None
        }
    };

    let refresher = database.as_ref().map(|db| {
        Arc::new(PriceRefresher::new(
            provider.clone(),
            db.clone(),
            Duration::from_millis(config.price_refresh_delay_ms),
        ))
    });

    let engine = AnalysisEngine::new(provider)
        .with_history_days(config.history_days)
        .with_metrics(metrics.clone());

    Ok(AppState {
        health: Arc::new(RwLock::new(HealthStatus::default())),
        metrics,
        start_time: Arc::new(Instant::now()),
        engine: Arc::new(engine),
        database,
        refresher,
        popular_symbols: Arc::new(config.popular_symbols.clone()),
    })
}

pub async fn start_server(state: AppState, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    info!(
        "Metrics endpoint available at http://0.0.0.0:{}/metrics",
        port
    );
    axum::serve(listener, app).await?;

    Ok(())
}
