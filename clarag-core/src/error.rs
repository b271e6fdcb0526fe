use std::{error::Error as StdError, fmt, time::Duration};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClaragError {
    #[error("LLM provider failed: {0}")]
    LlmProvider(String),
    #[error("Generation entry point unavailable: {0}")]
    EntryPointUnavailable(String),
    #[error("Parsing failed on output '{output}': {reason}")]
    ParseFailed { output: String, reason: String },
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ClaragError {
    /// True when the backend answered but does not expose the requested call.
    pub fn is_entry_point_unavailable(&self) -> bool {
        matches!(self, ClaragError::EntryPointUnavailable(_))
    }
}

#[derive(Debug)]
pub enum EmbeddingError {
    InvalidResponse(String),
    DimensionMismatch { expected: usize, got: usize },
    Timeout(Duration),
    Provider(String),
    Other(Box<dyn StdError + Send + Sync>),
}

impl fmt::Display for EmbeddingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmbeddingError::InvalidResponse(message) => {
                write!(f, "Embedding invalid response: {message}")
            }
            EmbeddingError::DimensionMismatch { expected, got } => {
                write!(f, "Embedding dimension mismatch: expected {expected}, got {got}")
            }
            EmbeddingError::Timeout(duration) => write!(f, "Embedding timeout after {duration:?}"),
            EmbeddingError::Provider(message) => write!(f, "Embedding provider error: {message}"),
            EmbeddingError::Other(error) => write!(f, "Embedding error: {error}"),
        }
    }
}

impl StdError for EmbeddingError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            EmbeddingError::Other(error) => Some(error.as_ref()),
            _ => None,
        }
    }
}
