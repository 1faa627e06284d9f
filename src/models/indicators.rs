use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Discrete trading recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Buy => "BUY",
            Signal::Sell => "SELL",
            Signal::Hold => "HOLD",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Signal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" => Ok(Signal::Buy),
            "SELL" => Ok(Signal::Sell),
            "HOLD" => Ok(Signal::Hold),
            other => Err(format!("unknown signal type '{}'", other)),
        }
    }
}

/// Output of a single indicator calculator.
///
/// `values` is never empty: calculators fail before building a result
/// when the input is too short.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorResult {
    /// Name including the parameterization, e.g. `SMA20`.
    #[serde(rename = "indicator")]
    pub name: String,
    pub period: usize,
    pub values: Vec<f64>,
    pub signal: Signal,
    /// Heuristic score in `[0, 100]`, already rounded.
    pub confidence: u8,
    pub description: String,
}

impl IndicatorResult {
    /// Most recent derived value.
    pub fn latest(&self) -> Option<f64> {
        self.values.last().copied()
    }
}
