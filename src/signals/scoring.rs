//! Signal derivation and confidence scoring

use crate::models::indicators::Signal;

pub const HOLD_CONFIDENCE: u8 = 50;
pub const MAX_CONFIDENCE: f64 = 95.0;

pub const RSI_OVERSOLD: f64 = 30.0;
pub const RSI_OVERBOUGHT: f64 = 70.0;
const RSI_BASE_CONFIDENCE: f64 = 70.0;

/// Round a raw score into the `[0, 100]` confidence range.
pub fn round_confidence(raw: f64) -> u8 {
    if raw.is_nan() {
        return 0;
    }
    raw.round().clamp(0.0, 100.0) as u8
}

/// Compare the latest price with the current and previous trend value.
///
/// Price above a rising average is BUY, below a falling one is SELL, with
/// confidence `base` plus the relative deviation in percent, capped at 95.
pub fn trend_signal(price: f64, current: f64, previous: f64, base: f64) -> (Signal, u8) {
    if price > current && current > previous {
        let deviation = ((price - current) / current).abs() * 100.0;
        (Signal::Buy, round_confidence((base + deviation).min(MAX_CONFIDENCE)))
    } else if price < current && current < previous {
        let deviation = ((current - price) / current).abs() * 100.0;
        (Signal::Sell, round_confidence((base + deviation).min(MAX_CONFIDENCE)))
    } else {
        (Signal::Hold, HOLD_CONFIDENCE)
    }
}

/// Apply [`trend_signal`] to the tail of a price series and its derived
/// values. The previous value falls back to the current one when only a
/// single value exists.
pub fn series_trend_signal(prices: &[f64], values: &[f64], base: f64) -> (Signal, u8) {
    match (prices.last(), values.last()) {
        (Some(&price), Some(&current)) => {
            let previous = values.len().checked_sub(2).map_or(current, |i| values[i]);
            trend_signal(price, current, previous, base)
        }
        _ => (Signal::Hold, HOLD_CONFIDENCE),
    }
}

/// Oversold/overbought classification of an RSI reading.
pub fn oscillator_signal(rsi: f64) -> (Signal, u8) {
    if rsi < RSI_OVERSOLD {
        let raw = (RSI_BASE_CONFIDENCE + (RSI_OVERSOLD - rsi)).min(MAX_CONFIDENCE);
        (Signal::Buy, round_confidence(raw))
    } else if rsi > RSI_OVERBOUGHT {
        let raw = (RSI_BASE_CONFIDENCE + (rsi - RSI_OVERBOUGHT)).min(MAX_CONFIDENCE);
        (Signal::Sell, round_confidence(raw))
    } else {
        (Signal::Hold, HOLD_CONFIDENCE)
    }
}
