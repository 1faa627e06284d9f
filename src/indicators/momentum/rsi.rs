//! RSI (Relative Strength Index) indicator

use crate::indicators::error::IndicatorError;
use crate::models::indicators::IndicatorResult;
use crate::signals::scoring::oscillator_signal;

pub const DEFAULT_RSI_PERIOD: usize = 14;

/// RSI series with Wilder smoothing.
///
/// RSI = 100 - (100 / (1 + RS))
/// RS = Average Gain / Average Loss
///
/// Averages are seeded with the mean of the first `period` gains and losses.
/// The first value is emitted from the seed, then one more per remaining
/// price change, giving `prices.len() - period` values.
pub fn rsi_series(prices: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || prices.len() < period + 1 {
        return Vec::new();
    }

    let (gains, losses): (Vec<f64>, Vec<f64>) = prices
        .windows(2)
        .map(|w| {
            let change = w[1] - w[0];
            (change.max(0.0), (-change).max(0.0))
        })
        .unzip();

    let period_f = period as f64;
    let mut avg_gain = gains[..period].iter().sum::<f64>() / period_f;
    let mut avg_loss = losses[..period].iter().sum::<f64>() / period_f;

    let mut values = Vec::with_capacity(gains.len() - period + 1);
    for i in period..=gains.len() {
        values.push(rsi_from_averages(avg_gain, avg_loss));

        if let (Some(&gain), Some(&loss)) = (gains.get(i), losses.get(i)) {
            avg_gain = (avg_gain * (period_f - 1.0) + gain) / period_f;
            avg_loss = (avg_loss * (period_f - 1.0) + loss) / period_f;
        }
    }

    values
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

/// Calculate RSI over `prices` (oldest first). Oversold readings (< 30)
/// signal BUY, overbought readings (> 70) signal SELL.
pub fn compute_rsi(prices: &[f64], period: usize) -> Result<IndicatorResult, IndicatorError> {
    let name = format!("RSI{}", period);
    if period == 0 {
        return Err(IndicatorError::InvalidPeriod);
    }
    if prices.len() < period + 1 {
        return Err(IndicatorError::insufficient(name, period + 1, prices.len()));
    }

    let values = rsi_series(prices, period);
    let (signal, confidence) = match values.last() {
        Some(&current) => oscillator_signal(current),
        None => return Err(IndicatorError::insufficient(name, period + 1, prices.len())),
    };

    Ok(IndicatorResult {
        name,
        period,
        values,
        signal,
        confidence,
        description: format!("Relative Strength Index over {} periods", period),
    })
}

/// Calculate RSI with default period (14)
pub fn compute_rsi_default(prices: &[f64]) -> Result<IndicatorResult, IndicatorError> {
    compute_rsi(prices, DEFAULT_RSI_PERIOD)
}
