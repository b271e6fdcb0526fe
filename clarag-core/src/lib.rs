mod document;
mod embedding;
mod error;
mod evidence;
mod fallbacks;
mod llm;
mod runnable;

pub use document::{parse_documents, Document, DOCUMENT_DELIMITER};
pub use embedding::Embedding;
pub use error::{ClaragError, EmbeddingError};
pub use evidence::{format_seconds, ClaraEvidence, Evidence, Mode, RagEvidence, RunOutcome};
pub use fallbacks::RunnableWithFallbacks;
pub use llm::{GenerationOptions, LlmRequest, LlmResponse, Message, Role};
pub use runnable::Runnable;

pub type Value = serde_json::Value;
