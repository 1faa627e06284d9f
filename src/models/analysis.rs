use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::indicators::{IndicatorResult, Signal};

/// Aggregated view over several indicator results for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeAnalysis {
    pub symbol: String,
    pub indicators: Vec<IndicatorResult>,
    pub overall_signal: Signal,
    pub overall_confidence: u8,
    /// Capture time of the analysis, not a market timestamp.
    pub timestamp: DateTime<Utc>,
}

impl CompositeAnalysis {
    pub fn count_signal(&self, signal: Signal) -> usize {
        self.indicators.iter().filter(|i| i.signal == signal).count()
    }

    pub fn summary(&self) -> SignalSummary {
        SignalSummary::from(self)
    }
}

/// Compact per-symbol entry for the top-signals listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalSummary {
    pub symbol: String,
    pub signal: Signal,
    pub confidence: u8,
    pub indicator_count: usize,
    pub buy_signals: usize,
    pub sell_signals: usize,
    pub timestamp: DateTime<Utc>,
}

impl From<&CompositeAnalysis> for SignalSummary {
    fn from(analysis: &CompositeAnalysis) -> Self {
        Self {
            symbol: analysis.symbol.clone(),
            signal: analysis.overall_signal,
            confidence: analysis.overall_confidence,
            indicator_count: analysis.indicators.len(),
            buy_signals: analysis.count_signal(Signal::Buy),
            sell_signals: analysis.count_signal(Signal::Sell),
            timestamp: analysis.timestamp,
        }
    }
}
