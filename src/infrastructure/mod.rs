//! Infrastructure layer module
//!
//! - Configuration management (figment)
//! - Logging infrastructure (tracing)
//! - HTTP surface for the query flow (axum)
//! - Service wiring from configuration

pub mod config;
pub mod http;
pub mod logging;
pub mod setup;
