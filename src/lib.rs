//! Product Search - semantic search over an e-commerce catalog
//!
//! Products are embedded with a feature-extraction model and stored in a
//! vector index; free-text queries are embedded the same way and answered with
//! the nearest products.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): models, the embedding normalizer, the
//!   metadata codec and the port traits
//! - **Adapters** (`adapters`): Hugging Face and Pinecone clients
//! - **Service Layer** (`services`): the seeding and query flows
//! - **Infrastructure Layer** (`infrastructure`): config, logging, HTTP, wiring
//! - **CLI Layer** (`cli`): command-line interface

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    decode_list, encode_list, normalize_embedding, Catalog, Config, EmbeddingResponse,
    IndexMatch, IndexRecord, Product, ProductMatch,
};
pub use domain::ports::{EmbeddingProvider, FeatureInput, IndexQuery, VectorIndex};
pub use domain::{DomainError, DomainResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{SearchService, SeedReport, SeedingService};
