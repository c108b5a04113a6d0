//! Catalog seeding service.
//!
//! Embeds the product catalog batch by batch and upserts each batch into the
//! vector index. Batches run strictly in order; the first failure stops the
//! run and leaves earlier batches committed.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Catalog, IndexRecord, Product};
use crate::domain::ports::{EmbeddingProvider, FeatureInput, VectorIndex};

/// Configuration for the seeding service.
#[derive(Debug, Clone)]
pub struct SeedingServiceConfig {
    /// Products per embedding request and upsert call.
    pub batch_size: usize,
}

impl Default for SeedingServiceConfig {
    fn default() -> Self {
        Self { batch_size: 10 }
    }
}

/// Progress for one committed batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchProgress {
    /// 1-based batch sequence number.
    pub batch: usize,
    /// Total number of batches in this run.
    pub total_batches: usize,
    /// Records upserted by this batch.
    pub records: usize,
}

/// Report from a completed seeding run.
#[derive(Debug, Clone)]
pub struct SeedReport {
    /// Batches committed.
    pub batches: usize,
    /// Records upserted across all batches.
    pub records: usize,
    /// When the first batch started.
    pub started_at: DateTime<Utc>,
    /// When the last batch committed.
    pub finished_at: DateTime<Utc>,
}

/// Seeding service that loads a catalog into the vector index.
pub struct SeedingService {
    embeddings: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    config: SeedingServiceConfig,
}

impl SeedingService {
    /// Create a seeding service over the given ports.
    pub fn new(
        embeddings: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndex>,
        config: SeedingServiceConfig,
    ) -> Self {
        Self {
            embeddings,
            index,
            config,
        }
    }

    /// Create a seeding service with the default batch size.
    pub fn with_defaults(
        embeddings: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndex>,
    ) -> Self {
        Self::new(embeddings, index, SeedingServiceConfig::default())
    }

    /// Effective batch size (never zero).
    pub fn batch_size(&self) -> usize {
        self.config.batch_size.max(1)
    }

    /// Seed the whole catalog.
    pub async fn seed(&self, catalog: &Catalog) -> DomainResult<SeedReport> {
        self.seed_with_progress(catalog, |_| {}).await
    }

    /// Seed the whole catalog, calling `on_batch` after every committed batch.
    pub async fn seed_with_progress<F>(
        &self,
        catalog: &Catalog,
        mut on_batch: F,
    ) -> DomainResult<SeedReport>
    where
        F: FnMut(&BatchProgress) + Send,
    {
        let started_at = Utc::now();
        let batch_size = self.batch_size();
        let total_batches = catalog.len().div_ceil(batch_size);
        let mut records = 0usize;

        tracing::info!(
            products = catalog.len(),
            batch_size,
            total_batches,
            index = %self.index.name(),
            model = %self.embeddings.model(),
            "seeding vector index"
        );

        for (position, batch) in catalog.products().chunks(batch_size).enumerate() {
            let batch_number = position + 1;
            let index_records = self.embed_batch(batch).await.map_err(|e| {
                tracing::error!(batch = batch_number, error = %e, "embedding generation failed");
                e
            })?;

            let written = self.index.upsert(&index_records).await.map_err(|e| {
                tracing::error!(batch = batch_number, error = %e, "upsert failed");
                e
            })?;
            records += written;

            tracing::info!(batch = batch_number, records = written, "processed batch {}", batch_number);
            on_batch(&BatchProgress {
                batch: batch_number,
                total_batches,
                records: written,
            });
        }

        let report = SeedReport {
            batches: total_batches,
            records,
            started_at,
            finished_at: Utc::now(),
        };
        tracing::info!(
            batches = report.batches,
            records = report.records,
            "successfully seeded vector index"
        );
        Ok(report)
    }

    /// Embed one batch and pair every product with its vector.
    async fn embed_batch(&self, batch: &[Product]) -> DomainResult<Vec<IndexRecord>> {
        let texts: Vec<String> = batch.iter().map(Product::embedding_text).collect();
        let response = self.embeddings.extract(FeatureInput::Batch(&texts)).await?;
        let vectors = response.into_per_input(batch.len())?;

        if vectors.iter().any(Vec::is_empty) {
            return Err(DomainError::InvalidEmbeddingFormat(
                "embedding service returned an empty vector".to_string(),
            ));
        }

        Ok(batch
            .iter()
            .zip(vectors)
            .map(|(product, vector)| IndexRecord::from_product(product, vector))
            .collect())
    }
}
