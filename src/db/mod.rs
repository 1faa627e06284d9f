//! Relational persistence

pub mod postgres;

pub use postgres::{DatabaseError, StockDatabase};
