use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clarag_core::{
    ClaraEvidence, Document, Evidence, GenerationOptions, LlmRequest, RunOutcome, Runnable,
};
use clarag_llm::GenerateFromTextRequest;
use clarag_prompt::clara_fallback_prompt;

use crate::{RagError, SharedLlm, MISSING_INPUT_MESSAGE};

const MODEL_NOT_LOADED: &str = "Error: CLaRa model not loaded. Please check the model download.";

pub type SharedEntryPoint = Arc<dyn Runnable<GenerateFromTextRequest, Vec<String>>>;

/// A loaded CLaRa model: its native `generate_from_text` call plus a plain
/// generation path for servers that do not expose it.
pub struct ClaraModel {
    entry_point: SharedEntryPoint,
    generator: SharedLlm,
    entry_point_missing: AtomicBool,
}

impl ClaraModel {
    pub fn new(entry_point: SharedEntryPoint, generator: SharedLlm) -> Self {
        Self {
            entry_point,
            generator,
            entry_point_missing: AtomicBool::new(false),
        }
    }

    pub fn entry_point(&self) -> &SharedEntryPoint {
        &self.entry_point
    }

    pub fn generator(&self) -> &SharedLlm {
        &self.generator
    }

    pub fn has_entry_point(&self) -> bool {
        !self.entry_point_missing.load(Ordering::Relaxed)
    }

    pub fn mark_entry_point_missing(&self) {
        self.entry_point_missing.store(true, Ordering::Relaxed);
    }

    /// Returns the answer and whether the native entry point produced it.
    async fn generate(
        &self,
        question: &str,
        docs: Vec<String>,
        options: &GenerationOptions,
    ) -> Result<(String, bool), RagError> {
        if self.has_entry_point() {
            let request =
                GenerateFromTextRequest::single(question, docs.clone(), options.max_new_tokens);
            match self.entry_point.invoke(request).await {
                Ok(answers) => {
                    return Ok((answers.into_iter().next().unwrap_or_default(), true));
                }
                Err(err) if err.is_entry_point_unavailable() => {
                    tracing::warn!(
                        "generate_from_text unavailable, switching CLaRa to plain generation"
                    );
                    self.mark_entry_point_missing();
                }
                Err(err) => return Err(err.into()),
            }
        }

        let prompt = clara_fallback_prompt(question, &docs)?;
        let response = self
            .generator
            .invoke(LlmRequest::from_prompt(prompt, options.clone()))
            .await?;
        Ok((response.content, false))
    }
}

/// Hand every document straight to CLaRa, no retrieval and no prompt stuffing.
#[derive(Clone)]
pub struct ClaraPipeline {
    model: Option<Arc<ClaraModel>>,
    options: GenerationOptions,
}

impl ClaraPipeline {
    pub fn new(model: Option<Arc<ClaraModel>>) -> Self {
        Self {
            model,
            options: GenerationOptions::default().with_context_window(4096),
        }
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    /// Never fails: problems come back as the answer text with no evidence.
    pub async fn run(&self, docs: &[Document], question: &str) -> RunOutcome {
        if docs.is_empty() || question.trim().is_empty() {
            return RunOutcome::message(MISSING_INPUT_MESSAGE);
        }
        let Some(model) = &self.model else {
            return RunOutcome::message(MODEL_NOT_LOADED);
        };

        let start = Instant::now();
        let texts: Vec<String> = docs.iter().map(|doc| doc.content.clone()).collect();

        let generation_start = Instant::now();
        let (answer, native) = match model.generate(question, texts, &self.options).await {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(error = %err, "CLaRa run failed");
                return RunOutcome::message(format!(
                    "Error running CLaRa: {err}\n\nNote: CLaRa API may differ. Check the model documentation."
                ));
            }
        };
        let generation_time = generation_start.elapsed();

        let evidence = ClaraEvidence {
            explanation: format!(
                "We passed {} docs directly to CLaRa, which compresses them into latent space (no prompt stuffing).",
                docs.len()
            ),
            docs_passed: docs.len(),
            native_entry_point: native,
            generation_time,
            total_time: start.elapsed(),
        };
        RunOutcome::answered(answer.trim(), Evidence::Clara(evidence))
    }
}
