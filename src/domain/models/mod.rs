//! Domain models for products, embeddings and index records.

pub mod config;
pub mod embedding;
pub mod index;
pub mod product;

pub use config::{
    Config, EmbeddingConfig, IndexConfig, LoggingConfig, SearchConfig, SeedingConfig, ServerConfig,
};
pub use embedding::{normalize_embedding, EmbeddingResponse, EmbeddingVector};
pub use index::{
    decode_list, encode_list, product_metadata, IndexMatch, IndexRecord, Metadata,
    MetadataValue, ProductMatch, LIST_SEPARATOR,
};
pub use product::{Catalog, Product};
