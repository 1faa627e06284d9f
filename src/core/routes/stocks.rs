use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use super::{analysis_error, normalize_symbol, provider_error};
use crate::core::http::{ApiError, AppState};
use crate::indicators::registry::IndicatorKind;
use crate::indicators::IndicatorError;
use crate::models::analysis::CompositeAnalysis;

const DEFAULT_TOP_SIGNALS: usize = 10;
const DEFAULT_HISTORY_DAYS: i32 = 30;
/// Days of history stored when a symbol is first tracked.
const SEED_HISTORY_DAYS: usize = 30;

#[derive(Debug, Deserialize)]
pub struct IndicatorQuery {
    pub period: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub days: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRequest {
    pub user_id: Option<i64>,
    pub symbol: Option<String>,
}

pub async fn get_analysis(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<CompositeAnalysis>, ApiError> {
    let symbol = normalize_symbol(&symbol)?;
    state
        .engine
        .analyze(&symbol)
        .await
        .map(Json)
        .map_err(|e| analysis_error("Failed to get technical analysis", &symbol, e))
}

pub async fn get_indicator(
    State(state): State<AppState>,
    Path((symbol, indicator)): Path<(String, String)>,
    Query(query): Query<IndicatorQuery>,
) -> Result<Json<Value>, ApiError> {
    let symbol = normalize_symbol(&symbol)?;
    let kind: IndicatorKind = indicator
        .parse()
        .map_err(|e: IndicatorError| {
            ApiError::bad_request("Unsupported indicator").with_message(e.to_string())
        })?;
    let period = query.period.unwrap_or_else(|| kind.default_period());

    let result = state
        .engine
        .compute_indicator(&symbol, kind, period)
        .await
        .map_err(|e| analysis_error("Failed to calculate indicator", &symbol, e))?;

    Ok(Json(json!({
        "symbol": symbol,
        "indicator": result,
        "timestamp": Utc::now(),
    })))
}

pub async fn get_top_signals(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Value>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_TOP_SIGNALS);
    let signals = state.engine.top_signals(&state.popular_symbols, limit).await;

    Ok(Json(json!({
        "totalAnalyzed": signals.len(),
        "signals": signals,
        "timestamp": Utc::now(),
    })))
}

/// Live quote, stored when a database is configured. Falls back to the last
/// stored price if the provider fails.
pub async fn get_price(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let symbol = normalize_symbol(&symbol)?;

    match state.provider().get_quote(&symbol).await {
        Ok(quote) => {
            if let Some(db) = &state.database {
                if let Err(e) = db.upsert_quote(&quote).await {
                    warn!(symbol = %symbol, error = %e, "Failed to store quote");
                }
            }
            Ok(Json(json!({ "price_data": quote })))
        }
        Err(e) => {
            if let Some(db) = &state.database {
                if let Ok(Some(entry)) = db.latest_price(&symbol).await {
                    warn!(symbol = %symbol, error = %e, "Serving stored price after provider failure");
                    return Ok(Json(json!({ "price_data": entry, "cached": true })));
                }
            }
            Err(provider_error("Failed to fetch stock price", &symbol, e))
        }
    }
}

pub async fn get_history(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Value>, ApiError> {
    let symbol = normalize_symbol(&symbol)?;
    let days = query.days.unwrap_or(DEFAULT_HISTORY_DAYS).max(1);
    let history = state.database()?.price_history(&symbol, days).await?;
    Ok(Json(json!({ "history": history })))
}

pub async fn search(
    State(state): State<AppState>,
    Path(query): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(ApiError::bad_request("Search query is required"));
    }
    let results = state
        .provider()
        .search_symbols(query)
        .await
        .map_err(|e| provider_error("Failed to search stocks", query, e))?;
    Ok(Json(json!({ "results": results })))
}

pub async fn get_stats(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let symbol = normalize_symbol(&symbol)?;
    match state.database()?.stock_stats(&symbol).await? {
        Some(stats) => Ok(Json(json!({ "stats": stats }))),
        None => Err(ApiError::not_found("No price data found for this symbol")),
    }
}

pub async fn list_tracked(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let stocks = state.database()?.list_tracked_stocks(user_id).await?;
    Ok(Json(json!({ "stocks": stocks })))
}

/// Track a symbol for a user, then seed its stored prices. Seeding failures
/// never undo the tracking.
pub async fn track(
    State(state): State<AppState>,
    Json(request): Json<TrackRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let (user_id, symbol) = match (request.user_id, request.symbol.as_deref()) {
        (Some(user_id), Some(symbol)) if !symbol.trim().is_empty() => {
            (user_id, symbol.trim().to_ascii_uppercase())
        }
        _ => return Err(ApiError::bad_request("User ID and symbol are required")),
    };
    let db = state.database()?.clone();

    let valid = state
        .provider()
        .validate_symbol(&symbol)
        .await
        .map_err(|e| provider_error("Failed to validate symbol", &symbol, e))?;
    if !valid {
        return Err(ApiError::bad_request("Invalid stock symbol"));
    }

    let stock = db.track_stock(user_id, &symbol).await?;
    info!(user_id = user_id, symbol = %symbol, "Stock tracked");

    match state.provider().get_history(&symbol, SEED_HISTORY_DAYS).await {
        Ok(history) => match db.insert_history(&symbol, &history.bars).await {
            Ok(inserted) => info!(symbol = %symbol, inserted, "Seeded price history"),
            Err(e) => warn!(symbol = %symbol, error = %e, "Failed to store price history"),
        },
        Err(e) => warn!(symbol = %symbol, error = %e, "Failed to fetch price history"),
    }

    match state.provider().get_quote(&symbol).await {
        Ok(quote) => {
            if let Err(e) = db.upsert_quote(&quote).await {
                warn!(symbol = %symbol, error = %e, "Failed to store quote");
            }
        }
        Err(e) => warn!(symbol = %symbol, error = %e, "Failed to fetch quote"),
    }

    Ok((StatusCode::CREATED, Json(json!({ "stock": stock }))))
}

pub async fn untrack(
    State(state): State<AppState>,
    Path(stock_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let symbol = state.database()?.untrack_stock(stock_id).await?;
    info!(stock_id = stock_id, symbol = %symbol, "Stock untracked");
    Ok(Json(json!({
        "message": "Stock removed from tracking",
        "symbol": symbol,
    })))
}

/// Kick off a background refresh of every tracked symbol.
pub async fn update_all(State(state): State<AppState>) -> Result<(StatusCode, Json<Value>), ApiError> {
    let refresher = state
        .refresher
        .clone()
        .ok_or_else(ApiError::database_unavailable)?;

    tokio::spawn(async move {
        if refresher.refresh_all().await.is_none() {
            info!("Price update already in progress");
        }
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({ "message": "Price update started for all tracked stocks" })),
    ))
}
