//! External collaborators: market data providers.

pub mod alpha_vantage;
pub mod market_data;

pub use alpha_vantage::AlphaVantageProvider;
pub use market_data::{InMemoryMarketDataProvider, MarketDataProvider, ProviderError};
