//! Domain errors for the product search system.

use thiserror::Error;

/// Domain-level errors raised by the search and seeding flows.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The inference response had an unusable shape.
    #[error("Invalid embedding format: {0}")]
    InvalidEmbeddingFormat(String),

    /// An upstream call failed or returned a non-success status.
    #[error("{service} request failed: {message}")]
    ExternalService {
        /// Upstream service name.
        service: String,
        /// Failure detail.
        message: String,
    },

    /// A credential or setting needed for the call is absent.
    #[error("Missing required configuration: {0}")]
    ConfigurationMissing(String),

    /// Caller input was rejected.
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// A payload could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl DomainError {
    /// Shorthand for an [`DomainError::ExternalService`] failure.
    pub fn external(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExternalService {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Whether the error was caused by the caller's input rather than the system.
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::ValidationFailed(_))
    }
}

/// Result alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}
