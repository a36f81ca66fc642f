//! Error types for the ingestion and embedding pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification of a failure, independent of the concrete variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Extension not in the supported set.
    UnsupportedFormat,
    /// File bytes could not be parsed for their format.
    Decode,
    /// Temporary file or other local resource failure.
    Resource,
    /// The embedding provider rejected or failed the call.
    Provider,
}

/// Errors raised while loading, staging or splitting documents.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("unsupported file extension: {extension:?} (supported: .txt, .pdf, .csv)")]
    UnsupportedFormat { extension: String },

    #[error("failed to decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    #[error("resource error: {0}")]
    Resource(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IngestError {
    pub fn decode(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        IngestError::Decode {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            IngestError::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            IngestError::Decode { .. } => ErrorKind::Decode,
            IngestError::Resource(_) | IngestError::Io(_) => ErrorKind::Resource,
        }
    }
}

/// Errors related to embedding operations.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding provider API key is not configured")]
    MissingApiKey,

    #[error("embedding provider rejected credentials: {0}")]
    Authentication(String),

    #[error("embedding provider rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("embedding provider returned {status}: {message}")]
    ServerError {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("embedding request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("invalid embedding response: {0}")]
    InvalidResponse(String),

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("embedding timeout")]
    Timeout,
}

impl EmbeddingError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Provider
    }
}

/// Errors related to the vector store sink.
#[derive(Debug, Error)]
pub enum VectorStoreError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    SerializeError(#[from] serde_json::Error),

    #[error("chunk/vector count mismatch: {chunks} chunks, {vectors} vectors")]
    CountMismatch { chunks: usize, vectors: usize },
}

/// Errors related to configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),

    #[error("path error: {0}")]
    PathError(String),

    #[error("validation error: {0}")]
    ValidationError(String),
}
