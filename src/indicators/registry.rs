//! Closed set of supported indicators and name-based dispatch

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::indicators::error::IndicatorError;
use crate::indicators::momentum::{compute_rsi, DEFAULT_RSI_PERIOD};
use crate::indicators::trend::{compute_ema, compute_sma, DEFAULT_EMA_PERIOD, DEFAULT_SMA_PERIOD};
use crate::models::indicators::IndicatorResult;

/// Indicator category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorCategory {
    Trend,
    Momentum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorKind {
    Sma,
    Ema,
    Rsi,
}

impl IndicatorKind {
    pub fn all() -> [IndicatorKind; 3] {
        [IndicatorKind::Sma, IndicatorKind::Ema, IndicatorKind::Rsi]
    }

    pub fn name(&self) -> &'static str {
        match self {
            IndicatorKind::Sma => "SMA",
            IndicatorKind::Ema => "EMA",
            IndicatorKind::Rsi => "RSI",
        }
    }

    pub fn category(&self) -> IndicatorCategory {
        match self {
            IndicatorKind::Sma | IndicatorKind::Ema => IndicatorCategory::Trend,
            IndicatorKind::Rsi => IndicatorCategory::Momentum,
        }
    }

    pub fn default_period(&self) -> usize {
        match self {
            IndicatorKind::Sma => DEFAULT_SMA_PERIOD,
            IndicatorKind::Ema => DEFAULT_EMA_PERIOD,
            IndicatorKind::Rsi => DEFAULT_RSI_PERIOD,
        }
    }

    /// Fewest prices the calculator accepts for `period`.
    pub fn min_points(&self, period: usize) -> usize {
        match self {
            IndicatorKind::Sma | IndicatorKind::Ema => period,
            IndicatorKind::Rsi => period + 1,
        }
    }

    /// Run the calculator for this kind over oldest-first `prices`.
    pub fn compute(&self, prices: &[f64], period: usize) -> Result<IndicatorResult, IndicatorError> {
        match self {
            IndicatorKind::Sma => compute_sma(prices, period),
            IndicatorKind::Ema => compute_ema(prices, period),
            IndicatorKind::Rsi => compute_rsi(prices, period),
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IndicatorKind {
    type Err = IndicatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sma" => Ok(IndicatorKind::Sma),
            "ema" => Ok(IndicatorKind::Ema),
            "rsi" => Ok(IndicatorKind::Rsi),
            _ => Err(IndicatorError::UnsupportedIndicator(s.to_string())),
        }
    }
}

/// One calculator invocation within an analysis plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorSpec {
    pub kind: IndicatorKind,
    pub period: usize,
}

impl IndicatorSpec {
    pub const fn new(kind: IndicatorKind, period: usize) -> Self {
        Self { kind, period }
    }

    pub fn compute(&self, prices: &[f64]) -> Result<IndicatorResult, IndicatorError> {
        self.kind.compute(prices, self.period)
    }
}

/// Calculators run by the comprehensive analysis, in order.
pub const ANALYSIS_PLAN: [IndicatorSpec; 4] = [
    IndicatorSpec::new(IndicatorKind::Sma, 20),
    IndicatorSpec::new(IndicatorKind::Sma, 50),
    IndicatorSpec::new(IndicatorKind::Ema, 12),
    IndicatorSpec::new(IndicatorKind::Rsi, 14),
];
