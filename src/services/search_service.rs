//! Semantic product search service.
//!
//! One query is one embedding call followed by one nearest-neighbor lookup.
//! Matches come back in the index's rank order and are only reshaped here,
//! never re-sorted or filtered.

use std::sync::Arc;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::ProductMatch;
use crate::domain::ports::{EmbeddingProvider, FeatureInput, IndexQuery, VectorIndex};

/// Configuration for the search service.
#[derive(Debug, Clone)]
pub struct SearchServiceConfig {
    /// Nearest neighbors requested per query.
    pub top_k: usize,
}

impl Default for SearchServiceConfig {
    fn default() -> Self {
        Self { top_k: 10 }
    }
}

/// Search service that turns free text into ranked products.
pub struct SearchService {
    embeddings: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    config: SearchServiceConfig,
}

impl SearchService {
    /// Create a search service over the given ports.
    pub fn new(
        embeddings: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndex>,
        config: SearchServiceConfig,
    ) -> Self {
        Self {
            embeddings,
            index,
            config,
        }
    }

    /// Create a search service returning the default top 10.
    pub fn with_defaults(
        embeddings: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndex>,
    ) -> Self {
        Self::new(embeddings, index, SearchServiceConfig::default())
    }

    /// Number of results requested per query.
    pub const fn top_k(&self) -> usize {
        self.config.top_k
    }

    /// Search the index for products matching `query`.
    ///
    /// Blank queries are rejected with [`DomainError::ValidationFailed`]
    /// before any external call is made.
    pub async fn search(&self, query: &str) -> DomainResult<Vec<ProductMatch>> {
        if query.trim().is_empty() {
            return Err(DomainError::ValidationFailed(
                "query must not be empty".to_string(),
            ));
        }

        let vector = self
            .embeddings
            .extract(FeatureInput::Single(query))
            .await?
            .flatten();
        if vector.is_empty() {
            return Err(DomainError::InvalidEmbeddingFormat(
                "embedding service returned an empty vector".to_string(),
            ));
        }
        tracing::debug!(dimension = vector.len(), "query embedded");

        let matches = self
            .index
            .query(&IndexQuery::with_metadata(vector, self.config.top_k))
            .await?;

        let products: Vec<ProductMatch> = matches
            .into_iter()
            .take(self.config.top_k)
            .map(ProductMatch::from_match)
            .collect();

        tracing::info!(results = products.len(), "search completed");
        Ok(products)
    }
}
