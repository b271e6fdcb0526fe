use clarag_core::ClaragError;
use clarag_retrieval::RetrievalError;

#[derive(Debug, thiserror::Error)]
pub enum RagError {
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),
    #[error(transparent)]
    Model(#[from] ClaragError),
    #[error("failed to load {model}: {reason}")]
    Load { model: String, reason: String },
}
