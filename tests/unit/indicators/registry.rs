//! Unit tests for indicator dispatch

use stockking::indicators::registry::{IndicatorCategory, IndicatorKind, IndicatorSpec, ANALYSIS_PLAN};
use stockking::indicators::IndicatorError;

use crate::common_prices::linear_closes;

#[test]
fn test_parse_is_case_insensitive() {
    assert_eq!("sma".parse::<IndicatorKind>().unwrap(), IndicatorKind::Sma);
    assert_eq!("EMA".parse::<IndicatorKind>().unwrap(), IndicatorKind::Ema);
    assert_eq!(" Rsi ".parse::<IndicatorKind>().unwrap(), IndicatorKind::Rsi);
}

#[test]
fn test_parse_unsupported_lists_available() {
    let err = "macd".parse::<IndicatorKind>().unwrap_err();
    assert_eq!(err, IndicatorError::UnsupportedIndicator("macd".to_string()));
    assert!(err.to_string().contains("Available: sma, ema, rsi"));
}

#[test]
fn test_kind_metadata() {
    assert_eq!(IndicatorKind::Sma.default_period(), 20);
    assert_eq!(IndicatorKind::Ema.default_period(), 12);
    assert_eq!(IndicatorKind::Rsi.default_period(), 14);

    assert_eq!(IndicatorKind::Rsi.min_points(14), 15);
    assert_eq!(IndicatorKind::Ema.min_points(12), 12);

    assert_eq!(IndicatorKind::Sma.category(), IndicatorCategory::Trend);
    assert_eq!(IndicatorKind::Rsi.category(), IndicatorCategory::Momentum);
    assert_eq!(IndicatorKind::all().len(), 3);
    assert_eq!(IndicatorKind::Ema.to_string(), "EMA");
}

#[test]
fn test_compute_dispatches_to_calculator() {
    let prices = linear_closes(40, 10.0, 1.0);
    for kind in IndicatorKind::all() {
        let period = kind.default_period();
        let result = kind.compute(&prices, period).unwrap();
        assert_eq!(result.name, format!("{}{}", kind.name(), period));
        assert_eq!(result.period, period);
    }
}

#[test]
fn test_analysis_plan_order() {
    let names: Vec<String> = ANALYSIS_PLAN
        .iter()
        .map(|spec| format!("{}{}", spec.kind.name(), spec.period))
        .collect();
    assert_eq!(names, vec!["SMA20", "SMA50", "EMA12", "RSI14"]);
}

#[test]
fn test_spec_compute_reports_shortfall() {
    let spec = IndicatorSpec::new(IndicatorKind::Sma, 50);
    let err = spec.compute(&linear_closes(49, 1.0, 1.0)).unwrap_err();
    assert!(matches!(
        err,
        IndicatorError::InsufficientData { required: 50, available: 49, .. }
    ));
}
