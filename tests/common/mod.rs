//! Common test utilities for integration tests
//!
//! In-memory doubles for the embedding and index ports, plus catalog fixtures.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use product_search::domain::models::{
    Catalog, EmbeddingResponse, IndexMatch, IndexRecord, Metadata, MetadataValue, Product,
};
use product_search::domain::ports::{EmbeddingProvider, FeatureInput, IndexQuery, VectorIndex};
use product_search::{DomainError, DomainResult};

/// Dimension of the vectors produced by [`MockEmbeddingProvider`].
pub const DIMENSION: usize = 4;

/// Embedding provider that returns deterministic vectors and records every call.
#[derive(Default)]
pub struct MockEmbeddingProvider {
    calls: AtomicUsize,
    inputs: Mutex<Vec<Vec<String>>>,
    /// 1-based call number that fails with an upstream error.
    fail_on_call: Option<usize>,
    /// Raw response returned for single-text requests instead of the default vector.
    single_response: Option<EmbeddingResponse>,
}

impl MockEmbeddingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on_call(call: usize) -> Self {
        Self {
            fail_on_call: Some(call),
            ..Self::default()
        }
    }

    pub fn with_single_response(response: EmbeddingResponse) -> Self {
        Self {
            single_response: Some(response),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Texts submitted by each call, in call order.
    pub fn inputs(&self) -> Vec<Vec<String>> {
        self.inputs.lock().unwrap().clone()
    }

    /// The vector produced for `text`.
    pub fn vector_for(text: &str) -> Vec<f32> {
        let len = text.len() as f32;
        (0..DIMENSION).map(|i| len + i as f32 / 10.0).collect()
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn extract(&self, input: FeatureInput<'_>) -> DomainResult<EmbeddingResponse> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let texts: Vec<String> = match input {
            FeatureInput::Single(text) => vec![text.to_string()],
            FeatureInput::Batch(texts) => texts.to_vec(),
        };
        self.inputs.lock().unwrap().push(texts.clone());

        if self.fail_on_call == Some(call) {
            return Err(DomainError::external("mock", "503 Service Unavailable"));
        }

        match input {
            FeatureInput::Single(text) => Ok(self
                .single_response
                .clone()
                .unwrap_or_else(|| EmbeddingResponse::FlatVector(Self::vector_for(text)))),
            FeatureInput::Batch(_) => Ok(EmbeddingResponse::BatchOfVectors(
                texts
                    .iter()
                    .map(|text| EmbeddingResponse::FlatVector(Self::vector_for(text)))
                    .collect(),
            )),
        }
    }
}

/// Vector index that records upserts and serves canned query results.
#[derive(Default)]
pub struct RecordingIndex {
    upserts: Mutex<Vec<Vec<IndexRecord>>>,
    queries: Mutex<Vec<IndexQuery>>,
    matches: Vec<IndexMatch>,
    fail_queries: bool,
    /// 1-based upsert call number that fails.
    fail_upsert_on: Option<usize>,
}

impl RecordingIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_matches(matches: Vec<IndexMatch>) -> Self {
        Self {
            matches,
            ..Self::default()
        }
    }

    pub fn failing_queries() -> Self {
        Self {
            fail_queries: true,
            ..Self::default()
        }
    }

    pub fn failing_upsert_on(call: usize) -> Self {
        Self {
            fail_upsert_on: Some(call),
            ..Self::default()
        }
    }

    /// Records of every upsert call, in call order.
    pub fn upserts(&self) -> Vec<Vec<IndexRecord>> {
        self.upserts.lock().unwrap().clone()
    }

    pub fn queries(&self) -> Vec<IndexQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl VectorIndex for RecordingIndex {
    fn name(&self) -> &str {
        "recording"
    }

    async fn upsert(&self, records: &[IndexRecord]) -> DomainResult<usize> {
        let mut upserts = self.upserts.lock().unwrap();
        if self.fail_upsert_on == Some(upserts.len() + 1) {
            return Err(DomainError::external("recording", "upsert rejected"));
        }
        upserts.push(records.to_vec());
        Ok(records.len())
    }

    async fn query(&self, query: &IndexQuery) -> DomainResult<Vec<IndexMatch>> {
        self.queries.lock().unwrap().push(query.clone());
        if self.fail_queries {
            return Err(DomainError::external("recording", "index unavailable"));
        }
        Ok(self.matches.clone())
    }
}

/// A product with predictable fields.
pub fn product(n: usize) -> Product {
    Product {
        id: format!("p{n:03}"),
        name: format!("Product {n}"),
        description: format!("Description of product {n}"),
        price: 10.0 + n as f64,
        category: "Test".to_string(),
        brand: "Acme".to_string(),
        rating: 4.0,
        in_stock: n % 2 == 0,
        image: format!("https://example.com/{n}.jpg"),
        colors: vec!["red".to_string(), "blue".to_string()],
        features: vec!["durable".to_string()],
    }
}

/// A catalog of `count` products with ids `p001..`.
pub fn catalog(count: usize) -> Catalog {
    Catalog::new((1..=count).map(product).collect()).unwrap()
}

/// An index match carrying encoded product metadata.
pub fn index_match(n: usize, score: f32) -> IndexMatch {
    let mut metadata = Metadata::new();
    metadata.insert("id".to_string(), MetadataValue::Text(format!("p{n:03}")));
    metadata.insert("name".to_string(), MetadataValue::Text(format!("Product {n}")));
    metadata.insert("price".to_string(), MetadataValue::Number(10.0 + n as f64));
    metadata.insert("inStock".to_string(), MetadataValue::Flag(true));
    metadata.insert("colors".to_string(), MetadataValue::Text("red|blue".to_string()));
    metadata.insert("features".to_string(), MetadataValue::Text(String::new()));
    IndexMatch {
        id: format!("p{n:03}"),
        score: Some(score),
        metadata: Some(metadata),
    }
}

pub fn shared<T>(value: T) -> Arc<T> {
    Arc::new(value)
}
