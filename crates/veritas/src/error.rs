//! Common error types for Veritas binaries.

use thiserror::Error;
use veritas_core::{ClassifyError, ConfigError, IndexError, KnowledgeBaseError};

/// Common error type for Veritas operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Model, index or knowledge-base loading failed
    #[error("load error: {0}")]
    Load(String),

    /// Classification request failed
    #[error(transparent)]
    Classify(#[from] ClassifyError),

    /// Internal error
    #[error("{0}")]
    Internal(String),
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<IndexError> for Error {
    fn from(e: IndexError) -> Self {
        Self::Load(e.to_string())
    }
}

impl From<KnowledgeBaseError> for Error {
    fn from(e: KnowledgeBaseError) -> Self {
        Self::Load(e.to_string())
    }
}

/// Result type alias using Veritas Error.
pub type Result<T> = std::result::Result<T, Error>;
