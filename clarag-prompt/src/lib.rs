mod template;
mod templates;

pub use template::PromptTemplate;
pub use templates::{build_context, clara_fallback_prompt, rag_prompt, RAG_PROMPT};
