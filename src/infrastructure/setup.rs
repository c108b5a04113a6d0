//! Service wiring.
//!
//! Builds the concrete adapters from [`Config`] and injects them into the
//! services as trait objects. Missing credentials fail here, before any
//! network call is made.

use std::sync::Arc;

use crate::adapters::embeddings::HuggingFaceEmbeddingProvider;
use crate::adapters::index::PineconeIndex;
use crate::domain::errors::DomainResult;
use crate::domain::models::Config;
use crate::domain::ports::{EmbeddingProvider, VectorIndex};
use crate::services::{SearchService, SearchServiceConfig, SeedingService, SeedingServiceConfig};

/// Build the feature-extraction client.
pub fn embedding_provider(config: &Config) -> DomainResult<Arc<dyn EmbeddingProvider>> {
    Ok(Arc::new(HuggingFaceEmbeddingProvider::new(&config.embedding)?))
}

/// Build the vector index client.
pub fn vector_index(config: &Config) -> DomainResult<Arc<dyn VectorIndex>> {
    Ok(Arc::new(PineconeIndex::new(&config.index)?))
}

/// Search service wired to the configured adapters.
pub fn search_service(config: &Config) -> DomainResult<SearchService> {
    Ok(SearchService::new(
        embedding_provider(config)?,
        vector_index(config)?,
        SearchServiceConfig {
            top_k: config.search.top_k,
        },
    ))
}

/// Seeding service wired to the configured adapters.
pub fn seeding_service(config: &Config) -> DomainResult<SeedingService> {
    Ok(SeedingService::new(
        embedding_provider(config)?,
        vector_index(config)?,
        SeedingServiceConfig {
            batch_size: config.seeding.batch_size,
        },
    ))
}
