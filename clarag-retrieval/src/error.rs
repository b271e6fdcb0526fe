use clarag_core::EmbeddingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),
    #[error("embedder returned {got} vectors for {expected} documents")]
    BatchSize { expected: usize, got: usize },
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

pub type RetrievalResult<T> = Result<T, RetrievalError>;
