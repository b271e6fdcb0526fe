use std::sync::Arc;
use std::time::Instant;

use clarag_core::{
    Document, Embedding, Evidence, GenerationOptions, LlmRequest, RagEvidence, RunOutcome,
    Runnable,
};
use clarag_prompt::{build_context, rag_prompt};
use clarag_retrieval::Retriever;

use crate::{RagError, SharedLlm, MISSING_INPUT_MESSAGE};

const MODELS_NOT_LOADED: &str = "Error: Models not loaded. Please restart the app.";

/// Retrieve the top-K documents, paste them into the prompt, generate.
#[derive(Clone)]
pub struct NormalRag {
    embedder: Option<Arc<dyn Embedding>>,
    llm: Option<SharedLlm>,
    options: GenerationOptions,
}

impl NormalRag {
    pub fn new(embedder: Option<Arc<dyn Embedding>>, llm: Option<SharedLlm>) -> Self {
        Self {
            embedder,
            llm,
            options: GenerationOptions::default().with_context_window(2048),
        }
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    /// Never fails: problems come back as the answer text with no evidence.
    pub async fn run(&self, docs: &[Document], question: &str, top_k: usize) -> RunOutcome {
        if docs.is_empty() || question.trim().is_empty() {
            return RunOutcome::message(MISSING_INPUT_MESSAGE);
        }
        let (Some(embedder), Some(llm)) = (&self.embedder, &self.llm) else {
            return RunOutcome::message(MODELS_NOT_LOADED);
        };

        match self.answer(embedder.clone(), llm, docs, question, top_k).await {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!(error = %err, "normal RAG run failed");
                RunOutcome::message(format!("Error running Normal RAG: {err}"))
            }
        }
    }

    async fn answer(
        &self,
        embedder: Arc<dyn Embedding>,
        llm: &SharedLlm,
        docs: &[Document],
        question: &str,
        top_k: usize,
    ) -> Result<RunOutcome, RagError> {
        let start = Instant::now();

        let retrieval_start = Instant::now();
        let selected = Retriever::new(embedder)
            .retrieve(docs, question, top_k)
            .await?;
        let retrieval_time = retrieval_start.elapsed();

        let selected_docs: Vec<String> = selected.iter().map(|doc| doc.content.clone()).collect();
        let prompt = rag_prompt(&build_context(&selected_docs), question)?;

        let generation_start = Instant::now();
        let response = llm
            .invoke(LlmRequest::from_prompt(prompt.clone(), self.options.clone()))
            .await?;
        let generation_time = generation_start.elapsed();

        tracing::debug!(
            retrieval_ms = retrieval_time.as_millis() as u64,
            generation_ms = generation_time.as_millis() as u64,
            "normal RAG answered"
        );

        let evidence = RagEvidence {
            top_k,
            explanation: format!("We retrieved Top-{top_k} docs and pasted them into the prompt."),
            scores: selected.iter().map(|doc| doc.score).collect(),
            indices: selected.iter().map(|doc| doc.index).collect(),
            selected_docs,
            prompt_length: prompt.chars().count(),
            retrieval_time,
            generation_time,
            total_time: start.elapsed(),
        };
        Ok(RunOutcome::answered(
            response.content.trim(),
            Evidence::Rag(evidence),
        ))
    }
}
