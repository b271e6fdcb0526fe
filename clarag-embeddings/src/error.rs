use std::time::Duration;

use clarag_core::EmbeddingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingProviderError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("expected embedding dimension {expected}, got {got}")]
    Dimension { expected: usize, got: usize },
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

impl From<EmbeddingProviderError> for EmbeddingError {
    fn from(error: EmbeddingProviderError) -> Self {
        match error {
            EmbeddingProviderError::InvalidResponse(message) => {
                EmbeddingError::InvalidResponse(message)
            }
            EmbeddingProviderError::Request(message) => EmbeddingError::Provider(message),
            EmbeddingProviderError::Dimension { expected, got } => {
                EmbeddingError::DimensionMismatch { expected, got }
            }
            EmbeddingProviderError::Timeout(timeout) => EmbeddingError::Timeout(timeout),
        }
    }
}

#[cfg(any(feature = "ollama", feature = "openai-compatible"))]
pub(crate) fn request_error(err: reqwest::Error, timeout: Duration) -> EmbeddingProviderError {
    if err.is_timeout() {
        EmbeddingProviderError::Timeout(timeout)
    } else {
        EmbeddingProviderError::Request(err.to_string())
    }
}

/// The deadline can also expire while the body is still streaming in.
#[cfg(any(feature = "ollama", feature = "openai-compatible"))]
pub(crate) fn decode_error(err: reqwest::Error, timeout: Duration) -> EmbeddingProviderError {
    if err.is_timeout() {
        EmbeddingProviderError::Timeout(timeout)
    } else {
        EmbeddingProviderError::InvalidResponse(err.to_string())
    }
}

/// A zero `expected` accepts any dimension.
pub(crate) fn check_dimension(
    expected: usize,
    embedding: &[f32],
) -> Result<(), EmbeddingProviderError> {
    if expected != 0 && embedding.len() != expected {
        return Err(EmbeddingProviderError::Dimension {
            expected,
            got: embedding.len(),
        });
    }
    Ok(())
}
