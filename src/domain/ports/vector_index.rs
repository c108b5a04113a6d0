//! Vector index port.
//!
//! The index owns storage, distance metric and nearest-neighbor search.
//! This crate only writes records into it and reads ranked matches back.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{EmbeddingVector, IndexMatch, IndexRecord};

/// A nearest-neighbor query.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexQuery {
    /// Query embedding.
    pub vector: EmbeddingVector,
    /// Maximum number of matches.
    pub top_k: usize,
    /// Whether matches carry their stored metadata.
    pub include_metadata: bool,
}

impl IndexQuery {
    /// Query for `top_k` neighbors with metadata included.
    pub const fn with_metadata(vector: EmbeddingVector, top_k: usize) -> Self {
        Self {
            vector,
            top_k,
            include_metadata: true,
        }
    }
}

/// Trait for hosted vector indexes.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Index name, for diagnostics.
    fn name(&self) -> &str;

    /// Insert or overwrite records by id. Returns the number of records written.
    async fn upsert(&self, records: &[IndexRecord]) -> DomainResult<usize>;

    /// Nearest neighbors of `query.vector`, best match first.
    async fn query(&self, query: &IndexQuery) -> DomainResult<Vec<IndexMatch>>;
}
