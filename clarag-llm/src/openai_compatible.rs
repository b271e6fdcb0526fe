//! Generic OpenAI-compatible chat client
//!
//! Works against anything serving `POST /chat/completions` in OpenAI's format:
//! OpenAI itself, vLLM, LM Studio, llama.cpp's server, text-generation-inference.

use std::fmt;
use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use url::Url;

use clarag_core::{ClaragError, Runnable};

use crate::{http_client, map_request_error, LlmRequest, LlmResponse, Message, DEFAULT_TIMEOUT};

/// Request body for chat completions endpoint
#[derive(Serialize, Debug, Clone)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    pub stream: bool,
}

/// Non-streaming response from chat completions
#[derive(Deserialize, Debug, Clone)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub model: String,
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Choice {
    pub index: u32,
    pub message: ResponseMessage,
    pub finish_reason: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ResponseMessage {
    pub role: String,
    pub content: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// OpenAI-style error response
#[derive(Deserialize, Debug, Clone)]
pub struct OpenAiError {
    pub error: ErrorDetail,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: Option<String>,
    pub code: Option<String>,
}

#[derive(Clone)]
pub struct OpenAiCompatibleClient {
    base_url: Url,
    model: String,
    api_key: Option<SecretString>,
    timeout: Duration,
    http: Client,
}

impl fmt::Debug for OpenAiCompatibleClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let api_key = if self.api_key.is_some() {
            "<redacted>"
        } else {
            "<none>"
        };

        f.debug_struct("OpenAiCompatibleClient")
            .field("base_url", &self.base_url.as_str())
            .field("model", &self.model)
            .field("api_key", &api_key)
            .finish()
    }
}

#[derive(Default, Clone)]
pub struct OpenAiCompatibleBuilder {
    base_url: Option<String>,
    model: Option<String>,
    api_key: Option<String>,
    timeout: Option<Duration>,
}

impl OpenAiCompatibleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url(mut self, value: impl Into<String>) -> Self {
        self.base_url = Some(value.into());
        self
    }

    pub fn model(mut self, value: impl Into<String>) -> Self {
        self.model = Some(value.into());
        self
    }

    /// Blank keys are treated as "no key", which local servers expect.
    pub fn api_key(mut self, value: impl Into<String>) -> Self {
        let value = value.into();
        self.api_key = if value.trim().is_empty() {
            None
        } else {
            Some(value)
        };
        self
    }

    pub fn timeout(mut self, value: Duration) -> Self {
        self.timeout = Some(value);
        self
    }

    pub fn build(self) -> Result<OpenAiCompatibleClient, ClaragError> {
        let raw = self
            .base_url
            .ok_or_else(|| ClaragError::InvalidConfig("base_url is required".to_string()))?;
        // Trailing slash so `join` appends instead of replacing the last segment.
        let normalized = format!("{}/", raw.trim_end_matches('/'));
        let base_url = Url::parse(&normalized)
            .map_err(|err| ClaragError::InvalidConfig(format!("invalid base_url '{raw}': {err}")))?;

        let model = self
            .model
            .filter(|model| !model.trim().is_empty())
            .ok_or_else(|| ClaragError::InvalidConfig("model is required".to_string()))?;

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        Ok(OpenAiCompatibleClient {
            base_url,
            model,
            api_key: self.api_key.map(SecretString::new),
            timeout,
            http: http_client(timeout)?,
        })
    }
}

impl OpenAiCompatibleClient {
    pub fn builder() -> OpenAiCompatibleBuilder {
        OpenAiCompatibleBuilder::new()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> Result<Url, ClaragError> {
        self.base_url
            .join("chat/completions")
            .map_err(|err| ClaragError::InvalidConfig(err.to_string()))
    }
}

fn provider_error(status: reqwest::StatusCode, body: &str) -> ClaragError {
    match serde_json::from_str::<OpenAiError>(body) {
        Ok(parsed) => ClaragError::LlmProvider(format!("{status}: {}", parsed.error.message)),
        Err(_) => ClaragError::LlmProvider(format!("{status}: {body}")),
    }
}

#[async_trait::async_trait]
impl Runnable<LlmRequest, LlmResponse> for OpenAiCompatibleClient {
    async fn invoke(&self, input: LlmRequest) -> Result<LlmResponse, ClaragError> {
        let model = if input.model.is_empty() {
            self.model.clone()
        } else {
            input.model
        };
        let request = ChatCompletionRequest {
            model,
            messages: input.messages,
            temperature: Some(input.options.temperature),
            max_tokens: Some(input.options.max_new_tokens),
            stream: false,
        };

        let mut builder = self.http.post(self.endpoint()?).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key.expose_secret());
        }

        let response = builder
            .send()
            .await
            .map_err(|err| map_request_error(err, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(provider_error(status, &body));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|err| ClaragError::LlmProvider(err.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ClaragError::ParseFailed {
                output: String::new(),
                reason: "response contained no choices".to_string(),
            })?;

        Ok(LlmResponse { content })
    }
}
