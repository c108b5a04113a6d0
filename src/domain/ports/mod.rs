//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that infrastructure adapters must implement:
//! - EmbeddingProvider: feature extraction for query and catalog text
//! - VectorIndex: record upserts and nearest-neighbor queries
//!
//! Services receive these as `Arc<dyn Trait>`, so tests can swap in doubles.

pub mod embedding;
pub mod vector_index;

pub use embedding::{EmbeddingProvider, FeatureInput};
pub use vector_index::{IndexQuery, VectorIndex};
