//! Unit tests for model serialization and helpers

use serde_json::json;
use stockking::models::indicators::{IndicatorResult, Signal};
use stockking::models::stock::SeriesOrder;
use stockking::signals::engine::AnalysisEngine;

use crate::common_prices::{history_from_closes, linear_closes};

#[test]
fn test_signal_parse_and_display() {
    assert_eq!("buy".parse::<Signal>().unwrap(), Signal::Buy);
    assert_eq!("SELL".parse::<Signal>().unwrap(), Signal::Sell);
    assert!("MAYBE".parse::<Signal>().is_err());
    assert_eq!(Signal::Hold.to_string(), "HOLD");
}

#[test]
fn test_indicator_result_wire_shape() {
    let result = IndicatorResult {
        name: "RSI14".to_string(),
        period: 14,
        values: vec![25.0],
        signal: Signal::Buy,
        confidence: 75,
        description: "Relative Strength Index over 14 periods".to_string(),
    };

    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["indicator"], "RSI14");
    assert_eq!(value["signal"], "BUY");
    assert_eq!(value["confidence"], 75);
    assert_eq!(value["values"], json!([25.0]));
    assert_eq!(result.latest(), Some(25.0));
}

#[test]
fn test_composite_analysis_uses_camel_case() {
    let analysis = AnalysisEngine::analyze_prices("AAPL", &linear_closes(60, 100.0, 1.0)).unwrap();
    let value = serde_json::to_value(&analysis).unwrap();

    assert_eq!(value["symbol"], "AAPL");
    assert_eq!(value["overallSignal"], "BUY");
    assert_eq!(value["overallConfidence"], 71);
    assert!(value["timestamp"].is_string());
    assert_eq!(value["indicators"].as_array().map(Vec::len), Some(4));

    let summary = serde_json::to_value(analysis.summary()).unwrap();
    assert_eq!(summary["indicatorCount"], 4);
    assert_eq!(summary["buySignals"], 3);
    assert_eq!(summary["sellSignals"], 1);
}

#[test]
fn test_price_history_order_conversion() {
    let history = history_from_closes("AAPL", &[1.0, 2.0, 3.0]);
    assert_eq!(history.order, SeriesOrder::OldestFirst);

    let newest = history.into_newest_first();
    assert_eq!(newest.order, SeriesOrder::NewestFirst);
    assert_eq!(newest.closes(), vec![3.0, 2.0, 1.0]);
    assert!(newest.bars[0].date > newest.bars[2].date);

    let oldest = newest.into_oldest_first();
    assert_eq!(oldest.closes(), vec![1.0, 2.0, 3.0]);
    assert_eq!(oldest.len(), 3);
}
