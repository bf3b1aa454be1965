// file: src/error.rs
// description: Custom error types, error kinds and result type aliases
// reference: https://docs.rs/thiserror

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RagError>;

#[derive(Error, Debug)]
pub enum RagError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Corpus is empty: nothing to index")]
    EmptyCorpus,

    #[error("Duplicate document id in corpus: {id}")]
    DuplicateDocument { id: String },

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Embedding provider failed: {0}")]
    Embedding(String),

    #[error("Generation provider failed: {0}")]
    Generation(String),

    #[error("A query is already in progress")]
    QueryInProgress,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Coarse classification carried by `error` events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    Configuration,
    EmbeddingFailure,
    GenerationFailure,
    Busy,
    InvalidInput,
    Dataset,
    Io,
}

impl RagError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RagError::Config(_)
            | RagError::EmptyCorpus
            | RagError::DuplicateDocument { .. }
            | RagError::DimensionMismatch { .. } => ErrorKind::Configuration,
            RagError::Embedding(_) => ErrorKind::EmbeddingFailure,
            RagError::Generation(_) => ErrorKind::GenerationFailure,
            RagError::QueryInProgress => ErrorKind::Busy,
            RagError::Validation(_) => ErrorKind::InvalidInput,
            RagError::Dataset(_) | RagError::Serialization(_) => ErrorKind::Dataset,
            RagError::Io(_) => ErrorKind::Io,
        }
    }
}
