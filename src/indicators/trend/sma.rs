//! SMA (Simple Moving Average) indicator

use crate::indicators::error::IndicatorError;
use crate::models::indicators::IndicatorResult;
use crate::signals::scoring::series_trend_signal;

pub const DEFAULT_SMA_PERIOD: usize = 20;
const SMA_BASE_CONFIDENCE: f64 = 60.0;

/// Mean of every `period`-wide window, one value per window ending at
/// `i >= period - 1`.
pub fn sma_series(prices: &[f64], period: usize) -> Vec<f64> {
    if period == 0 {
        return Vec::new();
    }
    prices
        .windows(period)
        .map(|window| window.iter().sum::<f64>() / period as f64)
        .collect()
}

/// Calculate SMA over `prices` (oldest first) and derive a trend signal from
/// the last price against the last two averages.
pub fn compute_sma(prices: &[f64], period: usize) -> Result<IndicatorResult, IndicatorError> {
    let name = format!("SMA{}", period);
    if period == 0 {
        return Err(IndicatorError::InvalidPeriod);
    }
    if prices.len() < period {
        return Err(IndicatorError::insufficient(name, period, prices.len()));
    }

    let values = sma_series(prices, period);
    let (signal, confidence) = series_trend_signal(prices, &values, SMA_BASE_CONFIDENCE);

    Ok(IndicatorResult {
        name,
        period,
        values,
        signal,
        confidence,
        description: format!("Simple Moving Average over {} periods", period),
    })
}

/// Calculate SMA with default period (20)
pub fn compute_sma_default(prices: &[f64]) -> Result<IndicatorResult, IndicatorError> {
    compute_sma(prices, DEFAULT_SMA_PERIOD)
}
