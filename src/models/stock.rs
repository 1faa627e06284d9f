use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::indicators::Signal;

/// One daily OHLCV bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl PriceBar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: i64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Chronological order of a bar sequence as delivered by its producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesOrder {
    OldestFirst,
    NewestFirst,
}

/// Daily history for a symbol together with the order its producer used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    pub symbol: String,
    pub order: SeriesOrder,
    pub bars: Vec<PriceBar>,
}

impl PriceHistory {
    pub fn new(symbol: impl Into<String>, order: SeriesOrder, bars: Vec<PriceBar>) -> Self {
        Self {
            symbol: symbol.into(),
            order,
            bars,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Normalize to oldest-first, the order every calculator expects.
    pub fn into_oldest_first(mut self) -> Self {
        if self.order == SeriesOrder::NewestFirst {
            self.bars.reverse();
            self.order = SeriesOrder::OldestFirst;
        }
        self
    }

    /// Normalize to newest-first, the order the dashboard displays.
    pub fn into_newest_first(mut self) -> Self {
        if self.order == SeriesOrder::OldestFirst {
            self.bars.reverse();
            self.order = SeriesOrder::NewestFirst;
        }
        self
    }

    /// Closing prices in the history's current order.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }
}

/// Latest quote for a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub symbol: String,
    pub price: f64,
    pub volume: i64,
    pub latest_trading_day: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub previous_close: f64,
    pub change: f64,
    pub change_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolMatch {
    pub symbol: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedStock {
    pub id: i64,
    pub symbol: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_points: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceHistoryEntry {
    pub id: i64,
    pub symbol: String,
    pub price: f64,
    pub volume: i64,
    pub trading_day: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockStats {
    pub data_points: i64,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub avg_price: Option<f64>,
    pub earliest_date: Option<NaiveDate>,
    pub latest_date: Option<NaiveDate>,
}

/// Persisted signal row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalRecord {
    pub id: i64,
    pub signal_type: Signal,
    pub confidence: i32,
    pub price_at_signal: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indicator_data: Option<Value>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalStats {
    pub signal_type: Signal,
    pub count: i64,
    pub avg_confidence: f64,
    pub last_signal: Option<DateTime<Utc>>,
}

/// Signal submitted for persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSignal {
    pub stock_id: i64,
    pub signal_type: Signal,
    pub confidence: i32,
    pub price_at_signal: f64,
    #[serde(default)]
    pub indicator_data: Option<Value>,
}
