//! Core application primitives (HTTP surface, scheduling)

pub mod http;
pub mod routes;
pub mod scheduler;

pub use http::*;
pub use scheduler::*;
