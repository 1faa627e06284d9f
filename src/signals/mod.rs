//! Signal scoring, aggregation and the comprehensive analysis engine.

pub mod aggregation;
pub mod engine;
pub mod error;
pub mod scoring;

pub use aggregation::*;
pub use engine::{AnalysisEngine, DEFAULT_HISTORY_DAYS, MIN_HISTORY};
pub use error::AnalysisError;
pub use scoring::*;
