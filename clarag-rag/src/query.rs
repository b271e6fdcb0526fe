use clarag_core::{parse_documents, Mode, RunOutcome};
use serde::Deserialize;

use crate::format::format_outcome;
use crate::{ClaraPipeline, GenerationSettings, ModelRegistry, NormalRag};

pub const NO_DOCUMENTS_MESSAGE: &str =
    "Error: No documents found. Please separate documents with '---'";

fn default_top_k() -> usize {
    3
}

/// One click of the Run button.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct QueryRequest {
    #[serde(default)]
    pub mode: Mode,
    pub documents: String,
    pub question: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

/// Dispatches a request to the pipeline its mode selects.
#[derive(Clone)]
pub struct QueryService {
    rag: NormalRag,
    clara: ClaraPipeline,
}

impl QueryService {
    pub fn new(rag: NormalRag, clara: ClaraPipeline) -> Self {
        Self { rag, clara }
    }

    pub fn from_registry(registry: &ModelRegistry, settings: &GenerationSettings) -> Self {
        Self {
            rag: NormalRag::new(registry.embedder(), registry.rag_llm())
                .with_options(settings.rag_options()),
            clara: ClaraPipeline::new(registry.clara()).with_options(settings.clara_options()),
        }
    }

    pub async fn run(&self, request: &QueryRequest) -> RunOutcome {
        let docs = parse_documents(&request.documents);
        if docs.is_empty() {
            return RunOutcome::message(NO_DOCUMENTS_MESSAGE);
        }

        tracing::info!(
            mode = %request.mode,
            docs = docs.len(),
            top_k = request.top_k,
            "processing query"
        );
        match request.mode {
            Mode::Clara => self.clara.run(&docs, &request.question).await,
            Mode::NormalRag => self.rag.run(&docs, &request.question, request.top_k).await,
        }
    }

    /// The result panel's markdown for a request.
    pub async fn process_query(&self, request: &QueryRequest) -> String {
        format_outcome(&self.run(request).await)
    }
}
