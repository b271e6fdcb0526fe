mod error;
mod hash;

#[cfg(feature = "ollama")]
mod ollama;

#[cfg(feature = "openai-compatible")]
mod openai_compatible;

use std::time::Duration;

pub use error::EmbeddingProviderError;
pub use hash::HashEmbedder;

#[cfg(feature = "ollama")]
pub use ollama::OllamaEmbedding;

#[cfg(feature = "openai-compatible")]
pub use openai_compatible::OpenAiCompatibleEmbedding;

/// Per-request deadline unless a provider is given its own.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
