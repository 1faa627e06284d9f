use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use super::normalize_symbol;
use crate::core::http::{ApiError, AppState};
use crate::models::indicators::Signal;
use crate::models::stock::NewSignal;

const DEFAULT_USER_SIGNALS: i64 = 50;
const DEFAULT_SYMBOL_SIGNALS: i64 = 20;

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSignalRequest {
    pub stock_id: Option<i64>,
    pub signal_type: Option<String>,
    pub confidence: Option<i32>,
    pub price_at_signal: Option<f64>,
    #[serde(default)]
    pub indicator_data: Option<Value>,
}

impl CreateSignalRequest {
    fn into_new_signal(self) -> Result<NewSignal, ApiError> {
        let (Some(stock_id), Some(signal_type), Some(confidence), Some(price_at_signal)) = (
            self.stock_id,
            self.signal_type,
            self.confidence,
            self.price_at_signal,
        ) else {
            return Err(ApiError::bad_request("Missing required fields"));
        };

        let signal_type: Signal = signal_type
            .parse()
            .map_err(|e: String| ApiError::bad_request("Invalid signal type").with_message(e))?;
        if !(0..=100).contains(&confidence) {
            return Err(ApiError::bad_request("Confidence must be between 0 and 100"));
        }

        Ok(NewSignal {
            stock_id,
            signal_type,
            confidence,
            price_at_signal,
            indicator_data: self.indicator_data,
        })
    }
}

fn limit_or(query: &LimitQuery, default: i64) -> i64 {
    query.limit.filter(|limit| *limit > 0).unwrap_or(default)
}

pub async fn list_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Value>, ApiError> {
    let limit = limit_or(&query, DEFAULT_USER_SIGNALS);
    let signals = state.database()?.signals_for_user(user_id, limit).await?;
    Ok(Json(json!({ "signals": signals })))
}

pub async fn list_for_symbol(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Value>, ApiError> {
    let symbol = normalize_symbol(&symbol)?;
    let limit = limit_or(&query, DEFAULT_SYMBOL_SIGNALS);
    let signals = state.database()?.signals_for_symbol(&symbol, limit).await?;
    Ok(Json(json!({ "signals": signals })))
}

pub async fn create_signal(
    State(state): State<AppState>,
    Json(request): Json<CreateSignalRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let new_signal = request.into_new_signal()?;
    let db = state.database()?;
    let signal = db.create_signal(&new_signal).await?;
    info!(
        stock_id = new_signal.stock_id,
        signal = %new_signal.signal_type,
        confidence = new_signal.confidence,
        "Signal stored"
    );
    Ok((StatusCode::CREATED, Json(json!({ "signal": signal }))))
}

pub async fn stats_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let stats = state.database()?.signal_stats(user_id).await?;
    Ok(Json(json!({ "stats": stats })))
}
