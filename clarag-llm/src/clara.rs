use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use clarag_core::{ClaragError, Runnable};

use crate::{http_client, map_request_error, DEFAULT_TIMEOUT};

/// Batch call into a CLaRa server: one document list per question.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GenerateFromTextRequest {
    pub questions: Vec<String>,
    pub documents: Vec<Vec<String>>,
    pub max_new_tokens: u32,
}

impl GenerateFromTextRequest {
    pub fn single(
        question: impl Into<String>,
        documents: Vec<String>,
        max_new_tokens: u32,
    ) -> Self {
        Self {
            questions: vec![question.into()],
            documents: vec![documents],
            max_new_tokens,
        }
    }
}

#[derive(Serialize)]
struct WireRequest<'a> {
    #[serde(skip_serializing_if = "str::is_empty")]
    model: &'a str,
    questions: &'a [String],
    documents: &'a [Vec<String>],
    max_new_tokens: u32,
}

/// Servers answer with a bare list, an `answers` object, or a single string.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireResponse {
    List(Vec<String>),
    Wrapped { answers: Vec<String> },
    Single(String),
}

impl From<WireResponse> for Vec<String> {
    fn from(response: WireResponse) -> Self {
        match response {
            WireResponse::List(answers) | WireResponse::Wrapped { answers } => answers,
            WireResponse::Single(answer) => vec![answer],
        }
    }
}

/// Client for the compression model's `generate_from_text` endpoint.
#[derive(Clone)]
pub struct ClaraClient {
    base_url: String,
    model: String,
    timeout: Duration,
    http: Client,
}

impl ClaraClient {
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

    /// One answer per question, each grounded in its own document list.
    pub async fn generate_from_text(
        &self,
        questions: Vec<String>,
        documents: Vec<Vec<String>>,
        max_new_tokens: u32,
    ) -> Result<Vec<String>, ClaragError> {
        self.invoke(GenerateFromTextRequest {
            questions,
            documents,
            max_new_tokens,
        })
        .await
    }
}

fn entry_point_missing(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::NOT_FOUND | StatusCode::METHOD_NOT_ALLOWED | StatusCode::NOT_IMPLEMENTED
    )
}

#[async_trait::async_trait]
impl Runnable<GenerateFromTextRequest, Vec<String>> for ClaraClient {
    async fn invoke(&self, input: GenerateFromTextRequest) -> Result<Vec<String>, ClaragError> {
        if input.questions.len() != input.documents.len() {
            return Err(ClaragError::InvalidConfig(format!(
                "{} questions but {} document lists",
                input.questions.len(),
                input.documents.len()
            )));
        }

        let url = format!("{}/generate_from_text", self.base_url);
        let body = WireRequest {
            model: &self.model,
            questions: &input.questions,
            documents: &input.documents,
            max_new_tokens: input.max_new_tokens,
        };

        let response = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|err| map_request_error(err, self.timeout))?;

        let status = response.status();
        if entry_point_missing(status) {
            tracing::debug!(%status, model = %self.model, "generate_from_text not served");
            return Err(ClaragError::EntryPointUnavailable(status.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClaragError::LlmProvider(format!("{status}: {body}")));
        }

        let parsed: WireResponse = response
            .json()
            .await
            .map_err(|err| ClaragError::LlmProvider(err.to_string()))?;
        Ok(parsed.into())
    }
}
