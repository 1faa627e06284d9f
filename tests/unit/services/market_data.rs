//! Unit tests for the in-memory market data provider

use chrono::NaiveDate;
use stockking::models::stock::{Quote, SeriesOrder};
use stockking::services::market_data::{
    InMemoryMarketDataProvider, MarketDataProvider, ProviderError,
};

use tokio_test::assert_ok;

use crate::common_prices::{history_from_closes, linear_closes};

fn quote(symbol: &str, price: f64) -> Quote {
    Quote {
        symbol: symbol.to_string(),
        price,
        volume: 1_000,
        latest_trading_day: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        open: price,
        high: price,
        low: price,
        previous_close: price,
        change: 0.0,
        change_percent: 0.0,
    }
}

#[tokio::test]
async fn test_history_is_newest_first_and_truncated() {
    let provider = InMemoryMarketDataProvider::new();
    provider
        .insert_history(history_from_closes("AAPL", &linear_closes(10, 1.0, 1.0)))
        .await;

    let history = assert_ok!(provider.get_history("aapl", 4).await);
    assert_eq!(history.order, SeriesOrder::NewestFirst);
    assert_eq!(history.closes(), vec![10.0, 9.0, 8.0, 7.0]);
}

#[tokio::test]
async fn test_missing_symbol_has_no_data() {
    let provider = InMemoryMarketDataProvider::new();
    assert!(matches!(
        provider.get_history("ZZZ", 10).await,
        Err(ProviderError::NoData(_))
    ));
    assert!(matches!(
        provider.get_quote("ZZZ").await,
        Err(ProviderError::NoData(_))
    ));
}

#[tokio::test]
async fn test_validate_symbol_uses_quotes() {
    let provider = InMemoryMarketDataProvider::new();
    provider.insert_quote(quote("MSFT", 410.0)).await;

    assert!(provider.validate_symbol("msft").await.unwrap());
    assert!(!provider.validate_symbol("NOPE").await.unwrap());
}

#[tokio::test]
async fn test_search_matches_substrings() {
    let provider = InMemoryMarketDataProvider::new();
    for symbol in ["AAPL", "AAL", "MSFT"] {
        provider
            .insert_history(history_from_closes(symbol, &[1.0, 2.0]))
            .await;
    }

    let matches = provider.search_symbols("aa").await.unwrap();
    let symbols: Vec<&str> = matches.iter().map(|m| m.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["AAL", "AAPL"]);
}
