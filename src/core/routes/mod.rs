//! Route handlers grouped by resource.

pub mod signals;
pub mod stocks;

use axum::http::StatusCode;
use tracing::error;

use crate::core::http::ApiError;
use crate::indicators::IndicatorError;
use crate::services::market_data::ProviderError;
use crate::signals::error::AnalysisError;

pub(crate) fn provider_status(e: &ProviderError) -> StatusCode {
    match e {
        ProviderError::NoData(_) => StatusCode::NOT_FOUND,
        ProviderError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
        _ => StatusCode::BAD_GATEWAY,
    }
}

pub(crate) fn analysis_status(e: &AnalysisError) -> StatusCode {
    match e {
        AnalysisError::InvalidSymbol => StatusCode::BAD_REQUEST,
        AnalysisError::InsufficientData { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        AnalysisError::Indicator(IndicatorError::InsufficientData { .. }) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        AnalysisError::Indicator(_) => StatusCode::BAD_REQUEST,
        AnalysisError::Provider(e) => provider_status(e),
    }
}

/// Map an analysis failure to a response, logging gateway-side failures.
pub(crate) fn analysis_error(context: &str, symbol: &str, e: AnalysisError) -> ApiError {
    let status = analysis_status(&e);
    if status.is_server_error() {
        error!(symbol = %symbol, error = %e, "{}", context);
    }
    ApiError::new(status, context).with_message(e.to_string())
}

pub(crate) fn provider_error(context: &str, symbol: &str, e: ProviderError) -> ApiError {
    let status = provider_status(&e);
    if status.is_server_error() {
        error!(symbol = %symbol, error = %e, "{}", context);
    }
    ApiError::new(status, context).with_message(e.to_string())
}

pub(crate) fn normalize_symbol(symbol: &str) -> Result<String, ApiError> {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        return Err(ApiError::bad_request("Symbol is required"));
    }
    Ok(symbol.to_ascii_uppercase())
}
