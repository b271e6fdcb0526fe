use std::time::Duration;

use async_trait::async_trait;
use clarag_core::{Embedding, EmbeddingError};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{check_dimension, decode_error, request_error};
use crate::{EmbeddingProviderError, DEFAULT_TIMEOUT};

/// `POST {base_url}/embeddings` in OpenAI's wire format. Serves OpenAI,
/// text-embeddings-inference, vLLM and LM Studio alike.
#[derive(Clone)]
pub struct OpenAiCompatibleEmbedding {
    base_url: String,
    model: String,
    api_key: Option<String>,
    dimension: usize,
    timeout: Duration,
    http: Client,
}

impl OpenAiCompatibleEmbedding {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, dimension: usize) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            api_key: None,
            dimension,
            timeout: DEFAULT_TIMEOUT,
            http: Client::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        self.api_key = if api_key.trim().is_empty() {
            None
        } else {
            Some(api_key)
        };
        self
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Deserialize)]
struct EmbeddingItem {
    #[serde(default)]
    index: Option<usize>,
    embedding: Vec<f32>,
}

#[async_trait]
impl Embedding for OpenAiCompatibleEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut batch = self.embed_batch(&[text.to_string()]).await?;
        batch.pop().ok_or_else(|| {
            EmbeddingProviderError::InvalidResponse("missing embedding".to_string()).into()
        })
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/embeddings", self.base_url.trim_end_matches('/'));
        let mut builder = self
            .http
            .post(url)
            .timeout(self.timeout)
            .json(&EmbeddingRequest {
                model: &self.model,
                input: texts,
            });
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response: EmbeddingResponse = builder
            .send()
            .await
            .map_err(|err| request_error(err, self.timeout))?
            .error_for_status()
            .map_err(|err| EmbeddingProviderError::Request(err.to_string()))?
            .json()
            .await
            .map_err(|err| decode_error(err, self.timeout))?;

        if response.data.len() != texts.len() {
            return Err(EmbeddingProviderError::InvalidResponse(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                response.data.len()
            ))
            .into());
        }

        let mut items = response.data;
        // Servers may return items out of order; `index` is authoritative.
        if items.iter().all(|item| item.index.is_some()) {
            items.sort_by_key(|item| item.index);
        }

        let mut out = Vec::with_capacity(items.len());
        for item in items {
            check_dimension(self.dimension, &item.embedding)?;
            out.push(item.embedding);
        }
        Ok(out)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
