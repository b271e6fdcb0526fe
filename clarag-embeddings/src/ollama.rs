use std::time::Duration;

use async_trait::async_trait;
use clarag_core::{Embedding, EmbeddingError};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{check_dimension, decode_error, request_error};
use crate::{EmbeddingProviderError, DEFAULT_TIMEOUT};

#[derive(Clone)]
pub struct OllamaEmbedding {
    base_url: String,
    model: String,
    dimension: usize,
    timeout: Duration,
    http: Client,
}

impl OllamaEmbedding {
    pub fn new(base_url: String, model: String, dimension: usize) -> Self {
        Self {
            base_url,
            model,
            dimension,
            timeout: DEFAULT_TIMEOUT,
            http: Client::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Serialize)]
struct OllamaEmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct OllamaEmbeddingResponse {
    embedding: Vec<f32>,
}

#[async_trait]
impl Embedding for OllamaEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let url = format!("{}/api/embeddings", self.base_url.trim_end_matches('/'));
        let req = OllamaEmbeddingRequest {
            model: &self.model,
            prompt: text,
        };
        let response: OllamaEmbeddingResponse = self
            .http
            .post(url)
            .timeout(self.timeout)
            .json(&req)
            .send()
            .await
            .map_err(|err| request_error(err, self.timeout))?
            .error_for_status()
            .map_err(|err| EmbeddingProviderError::Request(err.to_string()))?
            .json()
            .await
            .map_err(|err| decode_error(err, self.timeout))?;

        check_dimension(self.dimension, &response.embedding)?;
        Ok(response.embedding)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
