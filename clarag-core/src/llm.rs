use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Sampling knobs forwarded to the backend.
///
/// `context_window` bounds the prompt the backend will accept; providers map
/// it onto their own option (`num_ctx` for Ollama) or ignore it.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct GenerationOptions {
    pub max_new_tokens: u32,
    pub temperature: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_window: Option<u32>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            max_new_tokens: 256,
            temperature: 0.7,
            context_window: None,
        }
    }
}

impl GenerationOptions {
    pub fn with_context_window(mut self, tokens: u32) -> Self {
        self.context_window = Some(tokens);
        self
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct LlmRequest {
    /// Empty means "use the client's configured model".
    #[serde(default)]
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(default)]
    pub options: GenerationOptions,
}

impl LlmRequest {
    /// Single user turn carrying a fully rendered prompt.
    pub fn from_prompt(prompt: impl Into<String>, options: GenerationOptions) -> Self {
        Self {
            model: String::new(),
            messages: vec![Message::user(prompt)],
            options,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct LlmResponse {
    pub content: String,
}
