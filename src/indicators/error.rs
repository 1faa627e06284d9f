use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndicatorError {
    #[error("Insufficient data points for {indicator}. Need at least {required} points, got {available}.")]
    InsufficientData {
        indicator: String,
        required: usize,
        available: usize,
    },
    #[error("Unsupported indicator '{0}'. Available: sma, ema, rsi")]
    UnsupportedIndicator(String),
    #[error("Period must be at least 1")]
    InvalidPeriod,
}

impl IndicatorError {
    pub(crate) fn insufficient(indicator: impl Into<String>, required: usize, available: usize) -> Self {
        IndicatorError::InsufficientData {
            indicator: indicator.into(),
            required,
            available,
        }
    }
}
