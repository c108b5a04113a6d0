use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::errors::{DomainError, DomainResult};

/// Main configuration structure for product search
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Embedding (feature-extraction) service configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Vector index configuration
    #[serde(default)]
    pub index: IndexConfig,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Query flow configuration
    #[serde(default)]
    pub search: SearchConfig,

    /// Seeding flow configuration
    #[serde(default)]
    pub seeding: SeedingConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Embedding service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EmbeddingConfig {
    /// Inference API token (`HF_TOKEN`)
    #[serde(default, deserialize_with = "optional_identifier")]
    pub api_token: Option<String>,

    /// Model identifier (`EMBEDDING_MODEL`), e.g. `sentence-transformers/all-MiniLM-L6-v2`
    #[serde(default, deserialize_with = "optional_identifier")]
    pub model: Option<String>,

    /// Base URL of the inference provider
    #[serde(default = "default_embedding_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_embedding_base_url() -> String {
    "https://router.huggingface.co/hf-inference".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            model: None,
            base_url: default_embedding_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl EmbeddingConfig {
    /// The API token, or `ConfigurationMissing`.
    pub fn require_api_token(&self) -> DomainResult<&str> {
        require(self.api_token.as_deref(), "embedding.api_token (HF_TOKEN)")
    }

    /// The model id, or `ConfigurationMissing`.
    pub fn require_model(&self) -> DomainResult<&str> {
        require(self.model.as_deref(), "embedding.model (EMBEDDING_MODEL)")
    }
}

/// Vector index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct IndexConfig {
    /// Index API key (`PINECONE_API_KEY`)
    #[serde(default, deserialize_with = "optional_identifier")]
    pub api_key: Option<String>,

    /// Index name (`PINECONE_INDEX`)
    #[serde(default, deserialize_with = "optional_identifier")]
    pub name: Option<String>,

    /// Data-plane host; resolved through the control plane when unset (`PINECONE_HOST`)
    #[serde(default, deserialize_with = "optional_identifier")]
    pub host: Option<String>,

    /// Control-plane base URL
    #[serde(default = "default_control_plane_url")]
    pub control_plane_url: String,

    /// Value of the `X-Pinecone-API-Version` header
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_control_plane_url() -> String {
    "https://api.pinecone.io".to_string()
}

fn default_api_version() -> String {
    "2024-07".to_string()
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            name: None,
            host: None,
            control_plane_url: default_control_plane_url(),
            api_version: default_api_version(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl IndexConfig {
    /// The API key, or `ConfigurationMissing`.
    pub fn require_api_key(&self) -> DomainResult<&str> {
        require(self.api_key.as_deref(), "index.api_key (PINECONE_API_KEY)")
    }

    /// The index name, or `ConfigurationMissing`.
    pub fn require_name(&self) -> DomainResult<&str> {
        require(self.name.as_deref(), "index.name (PINECONE_INDEX)")
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Whether to enable permissive CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            enable_cors: default_true(),
        }
    }
}

/// Query flow configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SearchConfig {
    /// Number of nearest neighbors requested per query
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

const fn default_top_k() -> usize {
    10
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

/// Seeding flow configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SeedingConfig {
    /// Products per embedding request and upsert call
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// JSON catalog to seed from; the bundled catalog is used when unset
    #[serde(default)]
    pub catalog_path: Option<String>,
}

const fn default_batch_size() -> usize {
    10
}

impl Default for SeedingConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            catalog_path: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; stdout only when unset
    #[serde(default)]
    pub log_dir: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
        }
    }
}

/// Read an optional identifier that may arrive as a number or boolean.
///
/// Environment values are parsed into typed values, so `PINECONE_INDEX=2024`
/// reaches the deserializer as an integer.
fn optional_identifier<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Signed(i64),
        Unsigned(u64),
        Float(f64),
        Flag(bool),
    }

    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|scalar| match scalar {
        Scalar::Text(text) => text,
        Scalar::Signed(n) => n.to_string(),
        Scalar::Unsigned(n) => n.to_string(),
        Scalar::Float(n) => n.to_string(),
        Scalar::Flag(flag) => flag.to_string(),
    }))
}

fn require<'a>(value: Option<&'a str>, option: &str) -> DomainResult<&'a str> {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(DomainError::ConfigurationMissing(option.to_string())),
    }
}
