//! StockKing backend: technical-indicator engine, market-data proxy and the
//! HTTP API serving the dashboard.

pub mod config;
pub mod core;
pub mod db;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;
