//! Environment-driven configuration

use std::env;
use std::str::FromStr;

use crate::services::alpha_vantage::DEFAULT_BASE_URL;
use crate::signals::engine::DEFAULT_HISTORY_DAYS;

pub const DEFAULT_PORT: u16 = 3001;
/// Alpha Vantage free tier allows 5 calls per minute.
pub const DEFAULT_REFRESH_DELAY_MS: u64 = 12_000;

pub const DEFAULT_POPULAR_SYMBOLS: [&str; 10] = [
    "AAPL", "MSFT", "GOOGL", "AMZN", "TSLA", "META", "NVDA", "NFLX", "DIS", "BABA",
];

/// Deployment environment name (`APP_ENV`), `sandbox` when unset.
pub fn get_environment() -> String {
    env::var("APP_ENV").unwrap_or_else(|_| "sandbox".to_string())
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: String,
    pub port: u16,
    pub alpha_vantage_api_key: String,
    pub alpha_vantage_base_url: String,
    pub database_url: Option<String>,
    pub history_days: usize,
    pub popular_symbols: Vec<String>,
    /// 0 disables the background price refresher.
    pub price_refresh_interval_seconds: u64,
    pub price_refresh_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "sandbox".to_string(),
            port: DEFAULT_PORT,
            alpha_vantage_api_key: String::new(),
            alpha_vantage_base_url: DEFAULT_BASE_URL.to_string(),
            database_url: None,
            history_days: DEFAULT_HISTORY_DAYS,
            popular_symbols: DEFAULT_POPULAR_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            price_refresh_interval_seconds: 0,
            price_refresh_delay_ms: DEFAULT_REFRESH_DELAY_MS,
        }
    }
}

impl Config {
    /// Build from process environment, falling back to defaults for unset or
    /// unparsable values.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            environment: get_environment(),
            port: parse_var("PORT").unwrap_or(defaults.port),
            alpha_vantage_api_key: env::var("ALPHA_VANTAGE_API_KEY").unwrap_or_default(),
            alpha_vantage_base_url: env::var("ALPHA_VANTAGE_BASE_URL")
                .unwrap_or(defaults.alpha_vantage_base_url),
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty()),
            history_days: parse_var("ANALYSIS_HISTORY_DAYS").unwrap_or(defaults.history_days),
            popular_symbols: env::var("POPULAR_SYMBOLS")
                .ok()
                .map(|raw| parse_symbols(&raw))
                .filter(|symbols| !symbols.is_empty())
                .unwrap_or(defaults.popular_symbols),
            price_refresh_interval_seconds: parse_var("PRICE_REFRESH_INTERVAL_SECONDS")
                .unwrap_or(defaults.price_refresh_interval_seconds),
            price_refresh_delay_ms: parse_var("PRICE_REFRESH_DELAY_MS")
                .unwrap_or(defaults.price_refresh_delay_ms),
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self.environment.as_str(), "production" | "prod")
    }
}

fn parse_var<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Split a comma-separated symbol list, upper-casing and dropping blanks.
pub fn parse_symbols(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_ascii_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}
