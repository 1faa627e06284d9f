//! Market data provider interface.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::models::stock::{PriceHistory, Quote, SymbolMatch};

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Unexpected status {0}: {1}")]
    Status(u16, String),
    #[error("ALPHA_VANTAGE_API_KEY is required")]
    MissingApiKey,
    #[error("No data found for symbol: {0}")]
    NoData(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Rate limited by provider: {0}")]
    RateLimited(String),
}

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Daily history for `symbol`, at most `max_days` bars. The returned
    /// history states its own chronological order.
    async fn get_history(&self, symbol: &str, max_days: usize) -> Result<PriceHistory, ProviderError>;

    /// Latest quote for `symbol`.
    async fn get_quote(&self, symbol: &str) -> Result<Quote, ProviderError>;

    async fn search_symbols(&self, keywords: &str) -> Result<Vec<SymbolMatch>, ProviderError>;

    /// A symbol is valid when the provider returns a quote for it.
    async fn validate_symbol(&self, symbol: &str) -> Result<bool, ProviderError> {
        match self.get_quote(symbol).await {
            Ok(_) => Ok(true),
            Err(ProviderError::NoData(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// Provider serving fixed data from memory, keyed by upper-cased symbol.
#[derive(Default)]
pub struct InMemoryMarketDataProvider {
    histories: RwLock<HashMap<String, PriceHistory>>,
    quotes: RwLock<HashMap<String, Quote>>,
}

impl InMemoryMarketDataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_history(&self, history: PriceHistory) {
        let key = history.symbol.to_ascii_uppercase();
        self.histories.write().await.insert(key, history);
    }

    pub async fn insert_quote(&self, quote: Quote) {
        let key = quote.symbol.to_ascii_uppercase();
        self.quotes.write().await.insert(key, quote);
    }
}

#[async_trait]
impl MarketDataProvider for InMemoryMarketDataProvider {
    async fn get_history(&self, symbol: &str, max_days: usize) -> Result<PriceHistory, ProviderError> {
        let histories = self.histories.read().await;
        let history = histories
            .get(&symbol.to_ascii_uppercase())
            .cloned()
            .ok_or_else(|| ProviderError::NoData(symbol.to_string()))?;

        // Keep the most recent `max_days` bars whatever the stored order.
        let mut history = history.into_newest_first();
        history.bars.truncate(max_days);
        Ok(history)
    }

    async fn get_quote(&self, symbol: &str) -> Result<Quote, ProviderError> {
        self.quotes
            .read()
            .await
            .get(&symbol.to_ascii_uppercase())
            .cloned()
            .ok_or_else(|| ProviderError::NoData(symbol.to_string()))
    }

    async fn search_symbols(&self, keywords: &str) -> Result<Vec<SymbolMatch>, ProviderError> {
        let needle = keywords.to_ascii_uppercase();
        let histories = self.histories.read().await;
        let mut matches: Vec<SymbolMatch> = histories
            .keys()
            .filter(|symbol| symbol.contains(&needle))
            .map(|symbol| SymbolMatch {
                symbol: symbol.clone(),
                name: symbol.clone(),
            })
            .collect();
        matches.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        matches.truncate(10);
        Ok(matches)
    }
}
