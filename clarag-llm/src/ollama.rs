use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use clarag_core::{ClaragError, GenerationOptions, Runnable};

use crate::{http_client, map_request_error, LlmRequest, LlmResponse, Message, DEFAULT_TIMEOUT};

#[derive(Clone)]
pub struct OllamaClient {
    base_url: String,
    model: String,
    timeout: Duration,
    http: Client,
}

impl OllamaClient {
    pub fn new(base_url: String, model: String) -> Result<Self, ClaragError> {
        Self::with_timeout(base_url, model, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, ClaragError> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            timeout,
            http: http_client(timeout)?,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<Message>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    num_predict: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_ctx: Option<u32>,
}

impl From<GenerationOptions> for OllamaOptions {
    fn from(options: GenerationOptions) -> Self {
        Self {
            num_predict: options.max_new_tokens,
            temperature: options.temperature,
            num_ctx: options.context_window,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: OllamaMessage,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    content: String,
}

#[async_trait::async_trait]
impl Runnable<LlmRequest, LlmResponse> for OllamaClient {
    async fn invoke(&self, input: LlmRequest) -> Result<LlmResponse, ClaragError> {
        let LlmRequest {
            model,
            messages,
            options,
        } = input;
        let model = if model.is_empty() {
            self.model.clone()
        } else {
            model
        };
        let request = OllamaChatRequest {
            model,
            messages,
            stream: false,
            options: options.into(),
        };

        let url = format!("{}/api/chat", self.base_url);
        let response: OllamaChatResponse = self
            .http
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|err| map_request_error(err, self.timeout))?
            .error_for_status()
            .map_err(|err| ClaragError::LlmProvider(err.to_string()))?
            .json()
            .await
            .map_err(|err| ClaragError::LlmProvider(err.to_string()))?;

        Ok(LlmResponse {
            content: response.message.content,
        })
    }
}
