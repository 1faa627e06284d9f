use thiserror::Error;

use crate::indicators::IndicatorError;
use crate::services::market_data::ProviderError;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Symbol must not be empty")]
    InvalidSymbol,
    #[error("Insufficient historical data for technical analysis: need at least {required} closes, got {available}")]
    InsufficientData { required: usize, available: usize },
    #[error("Market data error: {0}")]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Indicator(#[from] IndicatorError),
}
