//! Passage Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer.

pub mod adapters;
pub mod config;
pub mod reporting;

pub use adapters::ReqwestTransport;
pub use config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, TransportConfig};
pub use reporting::TracingReporter;
