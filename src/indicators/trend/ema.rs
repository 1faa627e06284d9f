//! EMA (Exponential Moving Average) indicator

use crate::indicators::error::IndicatorError;
use crate::models::indicators::IndicatorResult;
use crate::signals::scoring::series_trend_signal;

pub const DEFAULT_EMA_PERIOD: usize = 12;
const EMA_BASE_CONFIDENCE: f64 = 65.0;

/// Smoothing factor `2 / (period + 1)`.
pub fn ema_multiplier(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}

/// EMA series seeded with the SMA of the first `period` prices.
///
/// Returns an empty vector when `period` is zero or exceeds the input length.
pub fn ema_series(prices: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || prices.len() < period {
        return Vec::new();
    }

    let multiplier = ema_multiplier(period);
    let seed = prices[..period].iter().sum::<f64>() / period as f64;

    let mut values = Vec::with_capacity(prices.len() - period + 1);
    values.push(seed);

    let mut previous = seed;
    for &price in &prices[period..] {
        previous = price * multiplier + previous * (1.0 - multiplier);
        values.push(previous);
    }

    values
}

/// Calculate EMA over `prices` (oldest first) and derive a trend signal the
/// same way SMA does, with a higher base confidence.
pub fn compute_ema(prices: &[f64], period: usize) -> Result<IndicatorResult, IndicatorError> {
    let name = format!("EMA{}", period);
    if period == 0 {
        return Err(IndicatorError::InvalidPeriod);
    }
    if prices.len() < period {
        return Err(IndicatorError::insufficient(name, period, prices.len()));
    }

    let values = ema_series(prices, period);
    let (signal, confidence) = series_trend_signal(prices, &values, EMA_BASE_CONFIDENCE);

    Ok(IndicatorResult {
        name,
        period,
        values,
        signal,
        confidence,
        description: format!("Exponential Moving Average over {} periods", period),
    })
}

/// Calculate EMA with default period (12)
pub fn compute_ema_default(prices: &[f64]) -> Result<IndicatorResult, IndicatorError> {
    compute_ema(prices, DEFAULT_EMA_PERIOD)
}
