//! Shared data models spanning the engine layers.

pub mod analysis;
pub mod indicators;
pub mod stock;

pub use analysis::{CompositeAnalysis, SignalSummary};
pub use indicators::{IndicatorResult, Signal};
pub use stock::{
    NewSignal, PriceBar, PriceHistory, PriceHistoryEntry, Quote, SeriesOrder, SignalRecord, SignalStats,
    StockStats, SymbolMatch, TrackedStock,
};
