pub mod error;
pub mod registry;

pub mod momentum;
pub mod trend;

pub use error::IndicatorError;
pub use momentum::compute_rsi;
pub use registry::*;
pub use trend::{compute_ema, compute_sma};
