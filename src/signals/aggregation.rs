//! Majority-vote aggregation of indicator signals

use crate::models::indicators::{IndicatorResult, Signal};
use crate::signals::scoring::{round_confidence, HOLD_CONFIDENCE};

/// Minimum number of indicators that must agree on a direction.
pub const MIN_AGREEING_INDICATORS: usize = 2;

/// Combine indicator signals into one overall signal
pub struct Aggregator;

impl Aggregator {
    /// BUY when buys outnumber sells and at least two indicators say BUY,
    /// SELL symmetrically, HOLD at 50 otherwise. Confidence is the rounded
    /// mean confidence of the winning side.
    pub fn aggregate(indicators: &[IndicatorResult]) -> (Signal, u8) {
        let buys: Vec<&IndicatorResult> = indicators.iter().filter(|i| i.signal == Signal::Buy).collect();
        let sells: Vec<&IndicatorResult> = indicators.iter().filter(|i| i.signal == Signal::Sell).collect();

        if buys.len() > sells.len() && buys.len() >= MIN_AGREEING_INDICATORS {
            (Signal::Buy, Self::mean_confidence(&buys))
        } else if sells.len() > buys.len() && sells.len() >= MIN_AGREEING_INDICATORS {
            (Signal::Sell, Self::mean_confidence(&sells))
        } else {
            (Signal::Hold, HOLD_CONFIDENCE)
        }
    }

    fn mean_confidence(agreeing: &[&IndicatorResult]) -> u8 {
        if agreeing.is_empty() {
            return HOLD_CONFIDENCE;
        }
        let sum: f64 = agreeing.iter().map(|i| i.confidence as f64).sum();
        round_confidence(sum / agreeing.len() as f64)
    }
}
