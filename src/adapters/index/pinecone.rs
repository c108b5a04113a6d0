//! Pinecone vector index adapter.
//!
//! Data-plane calls (`/vectors/upsert`, `/query`) go to the index host. When
//! no host is configured it is looked up once through the control plane and
//! cached for the lifetime of the adapter.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{IndexConfig, IndexMatch, IndexRecord, Metadata};
use crate::domain::ports::vector_index::{IndexQuery, VectorIndex};

const SERVICE: &str = "pinecone";

/// Pinecone-backed [`VectorIndex`].
pub struct PineconeIndex {
    client: Arc<reqwest::Client>,
    index_name: String,
    control_plane_url: String,
    host: OnceCell<String>,
}

impl PineconeIndex {
    /// Build an index client, failing fast when the key or index name is not configured.
    pub fn new(config: &IndexConfig) -> DomainResult<Self> {
        let api_key = config.require_api_key()?;
        let index_name = config.require_name()?.to_string();

        let mut headers = HeaderMap::new();
        headers.insert(
            "Api-Key",
            HeaderValue::from_str(api_key).map_err(|_| {
                DomainError::ValidationFailed("index API key contains invalid characters".to_string())
            })?,
        );
        headers.insert(
            "X-Pinecone-API-Version",
            HeaderValue::from_str(&config.api_version).map_err(|_| {
                DomainError::ValidationFailed(format!("invalid API version '{}'", config.api_version))
            })?,
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .default_headers(headers)
            .build()
            .map_err(|e| DomainError::external(SERVICE, format!("failed to build HTTP client: {e}")))?;

        let host = OnceCell::new_with(
            config
                .host
                .as_deref()
                .map(str::trim)
                .filter(|h| !h.is_empty())
                .map(normalize_host),
        );

        Ok(Self {
            client: Arc::new(client),
            index_name,
            control_plane_url: config.control_plane_url.trim_end_matches('/').to_string(),
            host,
        })
    }

    /// Data-plane base URL, resolving it through the control plane on first use.
    pub async fn host(&self) -> DomainResult<&str> {
        self.host
            .get_or_try_init(|| self.describe_host())
            .await
            .map(String::as_str)
    }

    async fn describe_host(&self) -> DomainResult<String> {
        let url = format!("{}/indexes/{}", self.control_plane_url, self.index_name);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DomainError::external(SERVICE, format!("describe index failed: {e}")))?;
        let description: IndexDescription = parse_response(response, "describe index").await?;

        tracing::info!(index = %self.index_name, host = %description.host, "resolved index host");
        Ok(normalize_host(&description.host))
    }

    async fn post<B, R>(&self, path: &str, body: &B, operation: &str) -> DomainResult<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.host().await?, path);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| DomainError::external(SERVICE, format!("{operation} failed: {e}")))?;
        parse_response(response, operation).await
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    fn name(&self) -> &str {
        &self.index_name
    }

    async fn upsert(&self, records: &[IndexRecord]) -> DomainResult<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let request = UpsertRequest {
            vectors: records
                .iter()
                .map(|record| UpsertVector {
                    id: &record.id,
                    values: &record.vector,
                    metadata: &record.metadata,
                })
                .collect(),
        };

        let response: UpsertResponse = self.post("/vectors/upsert", &request, "upsert").await?;
        Ok(response.upserted_count.unwrap_or(records.len()))
    }

    async fn query(&self, query: &IndexQuery) -> DomainResult<Vec<IndexMatch>> {
        let request = QueryRequest {
            vector: &query.vector,
            top_k: query.top_k,
            include_metadata: query.include_metadata,
            include_values: false,
        };

        let response: QueryResponse = self.post("/query", &request, "query").await?;
        Ok(response
            .matches
            .into_iter()
            .map(|m| IndexMatch {
                id: m.id,
                score: m.score,
                metadata: m.metadata,
            })
            .collect())
    }
}

async fn parse_response<R>(response: reqwest::Response, operation: &str) -> DomainResult<R>
where
    R: DeserializeOwned,
{
    if !response.status().is_success() {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unable to read response body".to_string());
        return Err(DomainError::external(
            SERVICE,
            format!("{operation} returned {status}: {body}"),
        ));
    }

    response
        .json()
        .await
        .map_err(|e| DomainError::SerializationError(format!("Failed to parse {operation} response: {e}")))
}

fn normalize_host(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

// -- Pinecone API request/response types --

#[derive(Debug, Serialize)]
struct UpsertRequest<'a> {
    vectors: Vec<UpsertVector<'a>>,
}

#[derive(Debug, Serialize)]
struct UpsertVector<'a> {
    id: &'a str,
    values: &'a [f32],
    metadata: &'a Metadata,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsertResponse {
    #[serde(default)]
    upserted_count: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    include_values: bool,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Debug, Deserialize)]
struct QueryMatch {
    id: String,
    #[serde(default)]
    score: Option<f32>,
    #[serde(default)]
    metadata: Option<Metadata>,
}

#[derive(Debug, Deserialize)]
struct IndexDescription {
    host: String,
}
