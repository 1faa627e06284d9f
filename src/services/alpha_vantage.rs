//! Alpha Vantage market data provider implementation

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::stock::{PriceBar, PriceHistory, Quote, SeriesOrder, SymbolMatch};
use crate::services::market_data::{MarketDataProvider, ProviderError};

pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";

const QUOTE_TIMEOUT: Duration = Duration::from_secs(10);
const HISTORY_TIMEOUT: Duration = Duration::from_secs(15);
const MAX_SEARCH_RESULTS: usize = 10;
/// Bars returned by `outputsize=compact`.
const COMPACT_SIZE: usize = 100;

#[derive(Debug, Deserialize)]
struct TimeSeriesResponse {
    #[serde(rename = "Time Series (Daily)")]
    time_series: Option<BTreeMap<String, DailyBar>>,
    #[serde(flatten)]
    notice: ApiNotice,
}

#[derive(Debug, Deserialize)]
struct DailyBar {
    #[serde(rename = "1. open")]
    open: String,
    #[serde(rename = "2. high")]
    high: String,
    #[serde(rename = "3. low")]
    low: String,
    #[serde(rename = "4. close")]
    close: String,
    #[serde(rename = "5. volume")]
    volume: String,
}

#[derive(Debug, Deserialize)]
struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote")]
    quote: Option<GlobalQuote>,
    #[serde(flatten)]
    notice: ApiNotice,
}

#[derive(Debug, Default, Deserialize)]
struct GlobalQuote {
    #[serde(rename = "01. symbol")]
    symbol: Option<String>,
    #[serde(rename = "02. open", default)]
    open: String,
    #[serde(rename = "03. high", default)]
    high: String,
    #[serde(rename = "04. low", default)]
    low: String,
    #[serde(rename = "05. price", default)]
    price: String,
    #[serde(rename = "06. volume", default)]
    volume: String,
    #[serde(rename = "07. latest trading day", default)]
    latest_trading_day: String,
    #[serde(rename = "08. previous close", default)]
    previous_close: String,
    #[serde(rename = "09. change", default)]
    change: String,
    #[serde(rename = "10. change percent", default)]
    change_percent: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "bestMatches", default)]
    best_matches: Vec<SearchMatch>,
    #[serde(flatten)]
    notice: ApiNotice,
}

#[derive(Debug, Deserialize)]
struct SearchMatch {
    #[serde(rename = "1. symbol")]
    symbol: String,
    #[serde(rename = "2. name")]
    name: String,
}

/// Informational fields Alpha Vantage returns instead of data.
#[derive(Debug, Default, Deserialize)]
struct ApiNotice {
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
}

impl ApiNotice {
    fn check(self, symbol: &str) -> Result<(), ProviderError> {
        if let Some(message) = self.note.or(self.information) {
            return Err(ProviderError::RateLimited(message));
        }
        if let Some(message) = self.error_message {
            debug!(symbol = %symbol, message = %message, "Alpha Vantage rejected request");
            return Err(ProviderError::NoData(symbol.to_string()));
        }
        Ok(())
    }
}

pub struct AlphaVantageProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AlphaVantageProvider {
    pub fn new(api_key: impl Into<String>) -> Result<Self, ProviderError> {
        Self::with_client(DEFAULT_BASE_URL, api_key, reqwest::Client::new())
    }

    pub fn with_client(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        client: reqwest::Client,
    ) -> Result<Self, ProviderError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ProviderError::MissingApiKey);
        }
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn query<T: DeserializeOwned>(
        &self,
        params: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<T, ProviderError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(params)
            .query(&[("apikey", self.api_key.as_str())])
            .timeout(timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status(status.as_u16(), body));
        }

        Ok(response.json::<T>().await?)
    }
}

fn parse_f64(field: &str, raw: &str) -> Result<f64, ProviderError> {
    raw.trim()
        .trim_end_matches('%')
        .parse::<f64>()
        .map_err(|e| ProviderError::Parse(format!("invalid {} '{}': {}", field, raw, e)))
}

fn parse_i64(field: &str, raw: &str) -> Result<i64, ProviderError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|e| ProviderError::Parse(format!("invalid {} '{}': {}", field, raw, e)))
}

fn parse_date(raw: &str) -> Result<NaiveDate, ProviderError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| ProviderError::Parse(format!("invalid date '{}': {}", raw, e)))
}

#[async_trait]
impl MarketDataProvider for AlphaVantageProvider {
    async fn get_history(&self, symbol: &str, max_days: usize) -> Result<PriceHistory, ProviderError> {
        let symbol = symbol.to_ascii_uppercase();
        let output_size = if max_days > COMPACT_SIZE { "full" } else { "compact" };

        let response: TimeSeriesResponse = self
            .query(
                &[
                    ("function", "TIME_SERIES_DAILY"),
                    ("symbol", symbol.as_str()),
                    ("outputsize", output_size),
                ],
                HISTORY_TIMEOUT,
            )
            .await?;
        response.notice.check(&symbol)?;

        let series = match response.time_series {
            Some(series) if !series.is_empty() => series,
            _ => {
                warn!(symbol = %symbol, "No historical data found");
                return Err(ProviderError::NoData(symbol));
            }
        };

        // Dates are ISO formatted, so reverse key order is newest first.
        let bars = series
            .iter()
            .rev()
            .take(max_days)
            .map(|(date, bar)| {
                Ok(PriceBar::new(
                    parse_date(date)?,
                    parse_f64("open", &bar.open)?,
                    parse_f64("high", &bar.high)?,
                    parse_f64("low", &bar.low)?,
                    parse_f64("close", &bar.close)?,
                    parse_i64("volume", &bar.volume)?,
                ))
            })
            .collect::<Result<Vec<_>, ProviderError>>()?;

        debug!(symbol = %symbol, bars = bars.len(), "Fetched daily history");
        Ok(PriceHistory::new(symbol, SeriesOrder::NewestFirst, bars))
    }

    async fn get_quote(&self, symbol: &str) -> Result<Quote, ProviderError> {
        let symbol = symbol.to_ascii_uppercase();
        let response: GlobalQuoteResponse = self
            .query(
                &[("function", "GLOBAL_QUOTE"), ("symbol", symbol.as_str())],
                QUOTE_TIMEOUT,
            )
            .await?;
        response.notice.check(&symbol)?;

        let quote = response.quote.unwrap_or_default();
        let quoted_symbol = match quote.symbol {
            Some(ref s) if !s.is_empty() => s.clone(),
            _ => {
                warn!(symbol = %symbol, "No quote found");
                return Err(ProviderError::NoData(symbol));
            }
        };

        Ok(Quote {
            symbol: quoted_symbol,
            price: parse_f64("price", &quote.price)?,
            volume: parse_i64("volume", &quote.volume)?,
            latest_trading_day: parse_date(&quote.latest_trading_day)?,
            open: parse_f64("open", &quote.open)?,
            high: parse_f64("high", &quote.high)?,
            low: parse_f64("low", &quote.low)?,
            previous_close: parse_f64("previous close", &quote.previous_close)?,
            change: parse_f64("change", &quote.change)?,
            change_percent: parse_f64("change percent", &quote.change_percent)?,
        })
    }

    async fn search_symbols(&self, keywords: &str) -> Result<Vec<SymbolMatch>, ProviderError> {
        let response: SearchResponse = self
            .query(
                &[("function", "SYMBOL_SEARCH"), ("keywords", keywords)],
                QUOTE_TIMEOUT,
            )
            .await?;
        response.notice.check(keywords)?;

        Ok(response
            .best_matches
            .into_iter()
            .take(MAX_SEARCH_RESULTS)
            .map(|m| SymbolMatch {
                symbol: m.symbol,
                name: m.name,
            })
            .collect())
    }
}
