mod clara;
mod ollama;

// OpenAI-compatible client (vLLM, LM Studio, llama.cpp server, OpenAI, ...)
pub mod openai_compatible;

use std::time::Duration;

pub use clara::{ClaraClient, GenerateFromTextRequest};
pub use clarag_core::{GenerationOptions, LlmRequest, LlmResponse, Message, Role};
pub use ollama::OllamaClient;
pub use openai_compatible::{OpenAiCompatibleBuilder, OpenAiCompatibleClient};

use clarag_core::ClaragError;

/// Generation on a CPU box can take a while.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client, ClaragError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|err| ClaragError::LlmProvider(err.to_string()))
}

pub(crate) fn map_request_error(err: reqwest::Error, timeout: Duration) -> ClaragError {
    if err.is_timeout() {
        ClaragError::Timeout(timeout)
    } else {
        ClaragError::LlmProvider(err.to_string())
    }
}
