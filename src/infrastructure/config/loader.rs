use std::path::Path;

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Project config file, merged when present.
pub const CONFIG_FILE: &str = "product-search.yaml";

/// Local override file, merged after [`CONFIG_FILE`] when present.
pub const LOCAL_CONFIG_FILE: &str = "product-search.local.yaml";

/// Prefix for structured environment overrides (`PRODUCT_SEARCH_INDEX__NAME`).
pub const ENV_PREFIX: &str = "PRODUCT_SEARCH_";

/// Environment variables recognized under their conventional names.
const LEGACY_ENV: [(&str, &str); 5] = [
    ("HF_TOKEN", "embedding.api_token"),
    ("EMBEDDING_MODEL", "embedding.model"),
    ("PINECONE_API_KEY", "index.api_key"),
    ("PINECONE_INDEX", "index.name"),
    ("PINECONE_HOST", "index.host"),
];

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid batch_size: {0}. Must be at least 1")]
    InvalidBatchSize(usize),

    #[error("Invalid top_k: {0}. Must be between 1 and 10000")]
    InvalidTopK(usize),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid server port: 0")]
    InvalidPort,

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. `product-search.yaml`, or `explicit` when given
    /// 3. `product-search.local.yaml` (optional local overrides)
    /// 4. Conventional env vars (`HF_TOKEN`, `EMBEDDING_MODEL`, `PINECONE_*`)
    /// 5. `PRODUCT_SEARCH_*` env vars, `__` separating nested keys
    ///
    /// `.env.local` and `.env` are read into the environment first; variables
    /// already set are left untouched.
    pub fn load(explicit: Option<&Path>) -> Result<Config> {
        load_env_files();

        let primary = explicit.unwrap_or_else(|| Path::new(CONFIG_FILE));
        if explicit.is_some() && !primary.exists() {
            anyhow::bail!("config file {} does not exist", primary.display());
        }

        let config: Config = Self::figment(primary)
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// The merged provider stack, without env-file loading or validation.
    pub fn figment(primary: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(primary))
            .merge(Yaml::file(LOCAL_CONFIG_FILE))
            .merge(legacy_env())
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Validate configuration after loading
    ///
    /// Credentials are not checked here; adapters require them when they are
    /// constructed, so commands that never touch a service do not need them.
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.seeding.batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize(config.seeding.batch_size));
        }

        if config.search.top_k == 0 || config.search.top_k > 10_000 {
            return Err(ConfigError::InvalidTopK(config.search.top_k));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        if config.server.port == 0 {
            return Err(ConfigError::InvalidPort);
        }

        if config.embedding.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "embedding.base_url cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Conventional env names, merged as raw strings so a token such as `007`
/// keeps its leading zero.
fn legacy_env() -> Figment {
    LEGACY_ENV
        .iter()
        .fold(Figment::new(), |figment, (name, path)| match std::env::var(name) {
            Ok(value) => figment.merge(Serialized::default(path, value)),
            Err(_) => figment,
        })
}

fn load_env_files() {
    for file in [".env.local", ".env"] {
        if let Ok(path) = dotenvy::from_filename(file) {
            tracing::debug!(path = %path.display(), "loaded environment file");
        }
    }
}
