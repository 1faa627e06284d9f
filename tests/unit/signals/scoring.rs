//! Unit tests for signal scoring helpers

use stockking::models::indicators::Signal;
use stockking::signals::scoring::{
    oscillator_signal, round_confidence, series_trend_signal, trend_signal, HOLD_CONFIDENCE,
};

#[test]
fn test_round_confidence_clamps() {
    assert_eq!(round_confidence(66.5), 67);
    assert_eq!(round_confidence(66.4), 66);
    assert_eq!(round_confidence(140.0), 100);
    assert_eq!(round_confidence(-3.0), 0);
    assert_eq!(round_confidence(f64::NAN), 0);
}

#[test]
fn test_trend_signal_buy_above_rising_average() {
    // 5% above the average on a base of 60.
    assert_eq!(trend_signal(105.0, 100.0, 99.0, 60.0), (Signal::Buy, 65));
}

#[test]
fn test_trend_signal_sell_below_falling_average() {
    assert_eq!(trend_signal(95.0, 100.0, 101.0, 65.0), (Signal::Sell, 70));
}

#[test]
fn test_trend_signal_caps_at_95() {
    assert_eq!(trend_signal(200.0, 100.0, 99.0, 60.0), (Signal::Buy, 95));
}

#[test]
fn test_trend_signal_holds_when_direction_disagrees() {
    assert_eq!(
        trend_signal(105.0, 100.0, 101.0, 60.0),
        (Signal::Hold, HOLD_CONFIDENCE)
    );
    assert_eq!(
        trend_signal(95.0, 100.0, 99.0, 60.0),
        (Signal::Hold, HOLD_CONFIDENCE)
    );
}

#[test]
fn test_series_trend_signal_empty_holds() {
    assert_eq!(series_trend_signal(&[], &[], 60.0), (Signal::Hold, HOLD_CONFIDENCE));
}

#[test]
fn test_oscillator_thresholds() {
    assert_eq!(oscillator_signal(25.0), (Signal::Buy, 75));
    assert_eq!(oscillator_signal(0.0), (Signal::Buy, 95));
    assert_eq!(oscillator_signal(80.0), (Signal::Sell, 80));
    assert_eq!(oscillator_signal(100.0), (Signal::Sell, 95));
    assert_eq!(oscillator_signal(50.0), (Signal::Hold, 50));
}

#[test]
fn test_oscillator_boundaries_are_exclusive() {
    assert_eq!(oscillator_signal(30.0).0, Signal::Hold);
    assert_eq!(oscillator_signal(70.0).0, Signal::Hold);
}
