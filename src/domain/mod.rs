//! Domain layer for product search
//!
//! Core models, errors and the port traits that external services implement.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
