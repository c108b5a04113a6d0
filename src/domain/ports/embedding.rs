//! Embedding provider port for semantic vector generation.
//!
//! Providers return the raw, shape-classified inference output. Turning that
//! into flat vectors is left to [`EmbeddingResponse`] so every provider is
//! normalized the same way.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::errors::DomainResult;
use crate::domain::models::EmbeddingResponse;

/// Text submitted for feature extraction.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum FeatureInput<'a> {
    /// One text; the response describes that text alone.
    Single(&'a str),
    /// Several texts; the response holds one entry per text, in order.
    Batch(&'a [String]),
}

impl FeatureInput<'_> {
    /// Number of texts carried by this input.
    pub const fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Batch(texts) => texts.len(),
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Trait for feature-extraction (embedding) providers.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Provider name (e.g., "huggingface").
    fn name(&self) -> &'static str;

    /// Model identifier requests are sent to.
    fn model(&self) -> &str;

    /// Run feature extraction and classify the response shape.
    async fn extract(&self, input: FeatureInput<'_>) -> DomainResult<EmbeddingResponse>;
}
