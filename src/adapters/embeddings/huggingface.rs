//! Hugging Face feature-extraction provider adapter.
//!
//! Talks to the `pipeline/feature-extraction` task of the Hugging Face
//! inference API. The response is kept as raw JSON until it has been
//! classified by [`EmbeddingResponse::from_value`], since its nesting depends
//! on the model and on how many inputs were sent.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{EmbeddingConfig, EmbeddingResponse};
use crate::domain::ports::embedding::{EmbeddingProvider, FeatureInput};

const SERVICE: &str = "huggingface";

/// Hugging Face feature-extraction provider.
pub struct HuggingFaceEmbeddingProvider {
    client: Arc<reqwest::Client>,
    endpoint: String,
    model: String,
}

impl HuggingFaceEmbeddingProvider {
    /// Build a provider, failing fast when the token or model is not configured.
    pub fn new(config: &EmbeddingConfig) -> DomainResult<Self> {
        let api_token = config.require_api_token()?;
        let model = config.require_model()?.to_string();

        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {api_token}")).map_err(|_| {
            DomainError::ValidationFailed("embedding API token contains invalid characters".to_string())
        })?;
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .default_headers(headers)
            .build()
            .map_err(|e| DomainError::external(SERVICE, format!("failed to build HTTP client: {e}")))?;

        let endpoint = format!(
            "{}/models/{}/pipeline/feature-extraction",
            config.base_url.trim_end_matches('/'),
            model
        );

        Ok(Self {
            client: Arc::new(client),
            endpoint,
            model,
        })
    }

    /// Full URL requests are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl EmbeddingProvider for HuggingFaceEmbeddingProvider {
    fn name(&self) -> &'static str {
        SERVICE
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn extract(&self, input: FeatureInput<'_>) -> DomainResult<EmbeddingResponse> {
        let request_body = FeatureExtractionRequest { inputs: input };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| DomainError::external(SERVICE, format!("feature extraction request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read response body".to_string());
            return Err(DomainError::external(
                SERVICE,
                format!("feature extraction returned {status}: {body}"),
            ));
        }

        let payload: serde_json::Value = response.json().await.map_err(|e| {
            DomainError::SerializationError(format!("Failed to parse feature extraction response: {e}"))
        })?;

        tracing::debug!(model = %self.model, inputs = input.len(), "feature extraction completed");
        EmbeddingResponse::from_value(&payload)
    }
}

// -- Hugging Face API request types --

#[derive(Debug, Serialize)]
struct FeatureExtractionRequest<'a> {
    inputs: FeatureInput<'a>,
}
