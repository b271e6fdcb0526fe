//! The two question-answering pipelines and everything around them: the
//! models loaded at startup, the dispatcher behind the UI's Run button and
//! the markdown rendering of a result.

mod clara;
mod error;
mod models;
mod query;
mod rag;

pub mod format;

use std::sync::Arc;

use clarag_core::Runnable;
use clarag_llm::{LlmRequest, LlmResponse};

pub use clara::{ClaraModel, ClaraPipeline};
pub use error::RagError;
pub use format::format_output;
pub use models::{
    ClaraConfig, EmbedderConfig, EmbedderProvider, GenerationSettings, LlmConfig, LlmProvider,
    ModelRegistry, ModelStatus, ModelsConfig,
};
pub use query::{QueryRequest, QueryService, NO_DOCUMENTS_MESSAGE};
pub use rag::NormalRag;

/// A chat-style generation backend shared across requests.
pub type SharedLlm = Arc<dyn Runnable<LlmRequest, LlmResponse>>;

/// Returned by both pipelines when the form is incomplete.
pub const MISSING_INPUT_MESSAGE: &str = "Please provide documents and a question.";
