//! Comprehensive technical analysis over provider-supplied daily history.

use std::sync::Arc;

use chrono::Utc;
use futures_util::future::join_all;
use tracing::{debug, warn};

use crate::indicators::registry::{IndicatorKind, ANALYSIS_PLAN};
use crate::metrics::Metrics;
use crate::models::analysis::{CompositeAnalysis, SignalSummary};
use crate::models::indicators::IndicatorResult;
use crate::services::market_data::{MarketDataProvider, ProviderError};
use crate::signals::aggregation::Aggregator;
use crate::signals::error::AnalysisError;

/// Fewest closes a comprehensive analysis accepts.
pub const MIN_HISTORY: usize = 50;
/// Days of history requested from the provider per analysis.
pub const DEFAULT_HISTORY_DAYS: usize = 100;

pub struct AnalysisEngine {
    provider: Arc<dyn MarketDataProvider + Send + Sync>,
    history_days: usize,
    metrics: Option<Arc<Metrics>>,
}

impl AnalysisEngine {
    pub fn new(provider: Arc<dyn MarketDataProvider + Send + Sync>) -> Self {
        Self {
            provider,
            history_days: DEFAULT_HISTORY_DAYS,
            metrics: None,
        }
    }

    pub fn with_history_days(mut self, history_days: usize) -> Self {
        self.history_days = history_days.max(MIN_HISTORY);
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn provider(&self) -> &Arc<dyn MarketDataProvider + Send + Sync> {
        &self.provider
    }

    /// Fetch history for `symbol` and run the full indicator plan over it.
    pub async fn analyze(&self, symbol: &str) -> Result<CompositeAnalysis, AnalysisError> {
        let result = self.analyze_inner(symbol).await;
        if let Some(metrics) = &self.metrics {
            metrics.analyses_total.inc();
            if result.is_err() {
                metrics.analysis_failures_total.inc();
            }
        }
        result
    }

    async fn analyze_inner(&self, symbol: &str) -> Result<CompositeAnalysis, AnalysisError> {
        let symbol = normalize_symbol(symbol)?;
        let closes = match self.fetch_closes(&symbol).await {
            Err(ProviderError::NoData(_)) => Vec::new(),
            other => other?,
        };

        if closes.len() < MIN_HISTORY {
            return Err(AnalysisError::InsufficientData {
                required: MIN_HISTORY,
                available: closes.len(),
            });
        }

        debug!(symbol = %symbol, closes = closes.len(), "Running comprehensive analysis");
        Self::analyze_prices(&symbol, &closes)
    }

    /// Run the indicator plan over oldest-first `closes` without touching the
    /// provider. Any calculator failure aborts the whole analysis.
    pub fn analyze_prices(symbol: &str, closes: &[f64]) -> Result<CompositeAnalysis, AnalysisError> {
        let indicators = ANALYSIS_PLAN
            .iter()
            .map(|spec| spec.compute(closes))
            .collect::<Result<Vec<IndicatorResult>, _>>()?;

        let (overall_signal, overall_confidence) = Aggregator::aggregate(&indicators);

        Ok(CompositeAnalysis {
            symbol: symbol.to_string(),
            indicators,
            overall_signal,
            overall_confidence,
            timestamp: Utc::now(),
        })
    }

    /// Fetch history for `symbol` and run a single calculator over it.
    pub async fn compute_indicator(
        &self,
        symbol: &str,
        kind: IndicatorKind,
        period: usize,
    ) -> Result<IndicatorResult, AnalysisError> {
        let symbol = normalize_symbol(symbol)?;
        let closes = match self.fetch_closes(&symbol).await {
            Err(ProviderError::NoData(_)) => Vec::new(),
            other => other?,
        };
        Ok(kind.compute(&closes, period)?)
    }

    /// Analyze every symbol concurrently. Failed symbols are logged and
    /// omitted; they never abort their siblings.
    pub async fn analyze_batch(&self, symbols: &[String]) -> Vec<CompositeAnalysis> {
        let results = join_all(symbols.iter().map(|symbol| self.analyze(symbol))).await;

        symbols
            .iter()
            .zip(results)
            .filter_map(|(symbol, result)| match result {
                Ok(analysis) => Some(analysis),
                Err(e) => {
                    warn!(symbol = %symbol, error = %e, "Skipping symbol in batch analysis");
                    None
                }
            })
            .collect()
    }

    /// Summaries for the first `limit` symbols, highest confidence first.
    pub async fn top_signals(&self, symbols: &[String], limit: usize) -> Vec<SignalSummary> {
        let selected = &symbols[..limit.min(symbols.len())];
        let mut summaries: Vec<SignalSummary> = self
            .analyze_batch(selected)
            .await
            .iter()
            .map(SignalSummary::from)
            .collect();
        summaries.sort_by(|a, b| b.confidence.cmp(&a.confidence));
        summaries
    }

    async fn fetch_closes(&self, symbol: &str) -> Result<Vec<f64>, ProviderError> {
        let history = self.provider.get_history(symbol, self.history_days).await?;
        Ok(history.into_oldest_first().closes())
    }
}

fn normalize_symbol(symbol: &str) -> Result<String, AnalysisError> {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        return Err(AnalysisError::InvalidSymbol);
    }
    Ok(symbol.to_ascii_uppercase())
}
