//! Embedding provider adapters.

pub mod huggingface;

pub use huggingface::HuggingFaceEmbeddingProvider;
