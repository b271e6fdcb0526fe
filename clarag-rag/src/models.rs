use std::sync::Arc;
use std::time::Duration;

use clarag_core::{Embedding, GenerationOptions, Runnable, RunnableWithFallbacks};
use clarag_embeddings::{HashEmbedder, OllamaEmbedding, OpenAiCompatibleEmbedding};
use clarag_llm::{
    ClaraClient, GenerateFromTextRequest, LlmRequest, OllamaClient, OpenAiCompatibleClient,
};
use serde::{Deserialize, Serialize};

use crate::{ClaraModel, RagError, SharedLlm};

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum EmbedderProvider {
    Ollama,
    OpenaiCompatible,
    /// Offline token-hash embedder, no server needed.
    Hash,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct EmbedderConfig {
    #[serde(default = "default_embedder_provider")]
    pub provider: EmbedderProvider,
    #[serde(default = "default_ollama_url")]
    pub base_url: String,
    #[serde(default = "default_embedding_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Expected vector length; 0 accepts whatever the backend returns.
    #[serde(default = "default_dimension")]
    pub dimension: usize,
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            provider: default_embedder_provider(),
            base_url: default_ollama_url(),
            model: default_embedding_model(),
            api_key: None,
            dimension: default_dimension(),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LlmProvider {
    Ollama,
    OpenaiCompatible,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct LlmConfig {
    #[serde(default = "default_llm_provider")]
    pub provider: LlmProvider,
    #[serde(default = "default_ollama_url")]
    pub base_url: String,
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl LlmConfig {
    pub fn ollama(model: impl Into<String>) -> Self {
        Self {
            provider: default_llm_provider(),
            base_url: default_ollama_url(),
            model: model.into(),
            api_key: None,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ClaraConfig {
    /// Server exposing `POST /generate_from_text`.
    #[serde(default = "default_clara_url")]
    pub base_url: String,
    #[serde(default = "default_clara_model")]
    pub model: String,
    /// Plain chat endpoint for the same model, used when the server lacks
    /// `generate_from_text`. Defaults to `{base_url}/v1`, OpenAI-compatible.
    #[serde(default)]
    pub generation: Option<LlmConfig>,
}

impl Default for ClaraConfig {
    fn default() -> Self {
        Self {
            base_url: default_clara_url(),
            model: default_clara_model(),
            generation: None,
        }
    }
}

impl ClaraConfig {
    fn generation_config(&self) -> LlmConfig {
        self.generation.clone().unwrap_or_else(|| LlmConfig {
            provider: LlmProvider::OpenaiCompatible,
            base_url: format!("{}/v1", self.base_url.trim_end_matches('/')),
            model: self.model.clone(),
            api_key: None,
        })
    }
}

/// Sampling settings shared by both pipelines.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct GenerationSettings {
    #[serde(default = "default_max_new_tokens")]
    pub max_new_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_rag_context_window")]
    pub rag_context_window: u32,
    #[serde(default = "default_clara_context_window")]
    pub clara_context_window: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            max_new_tokens: default_max_new_tokens(),
            temperature: default_temperature(),
            rag_context_window: default_rag_context_window(),
            clara_context_window: default_clara_context_window(),
        }
    }
}

impl GenerationSettings {
    pub fn rag_options(&self) -> GenerationOptions {
        GenerationOptions {
            max_new_tokens: self.max_new_tokens,
            temperature: self.temperature,
            context_window: Some(self.rag_context_window),
        }
    }

    pub fn clara_options(&self) -> GenerationOptions {
        GenerationOptions {
            max_new_tokens: self.max_new_tokens,
            temperature: self.temperature,
            context_window: Some(self.clara_context_window),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ModelsConfig {
    #[serde(default)]
    pub embedder: EmbedderConfig,
    #[serde(default = "default_rag_llm")]
    pub rag_llm: LlmConfig,
    #[serde(default = "default_rag_fallback_llm")]
    pub rag_fallback_llm: Option<LlmConfig>,
    #[serde(default = "default_clara")]
    pub clara: Option<ClaraConfig>,
    /// Send a tiny request to every backend at startup.
    #[serde(default = "default_true")]
    pub probe: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            embedder: EmbedderConfig::default(),
            rag_llm: default_rag_llm(),
            rag_fallback_llm: default_rag_fallback_llm(),
            clara: default_clara(),
            probe: default_true(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ModelsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_embedder_provider() -> EmbedderProvider {
    EmbedderProvider::Ollama
}

fn default_llm_provider() -> LlmProvider {
    LlmProvider::Ollama
}

fn default_clara_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_clara_model() -> String {
    "apple/CLaRa-7B-Instruct".to_string()
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_embedding_model() -> String {
    "all-minilm".to_string()
}

fn default_dimension() -> usize {
    384
}

fn default_rag_llm() -> LlmConfig {
    LlmConfig::ollama("qwen2.5:3b-instruct")
}

fn default_rag_fallback_llm() -> Option<LlmConfig> {
    Some(LlmConfig::ollama("phi3:mini"))
}

fn default_clara() -> Option<ClaraConfig> {
    Some(ClaraConfig::default())
}

fn default_true() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_max_new_tokens() -> u32 {
    256
}

fn default_temperature() -> f32 {
    0.7
}

fn default_rag_context_window() -> u32 {
    2048
}

fn default_clara_context_window() -> u32 {
    4096
}

/// Which models are available, for the health endpoint.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ModelStatus {
    pub embedder: bool,
    pub rag_llm: Option<String>,
    pub clara: bool,
}

/// Models loaded once at startup and shared read-only by every request.
#[derive(Clone, Default)]
pub struct ModelRegistry {
    embedder: Option<Arc<dyn Embedding>>,
    rag_llm: Option<SharedLlm>,
    rag_llm_name: Option<String>,
    clara: Option<Arc<ClaraModel>>,
}

impl ModelRegistry {
    pub fn new(
        embedder: Option<Arc<dyn Embedding>>,
        rag_llm: Option<SharedLlm>,
        clara: Option<Arc<ClaraModel>>,
    ) -> Self {
        let rag_llm_name = rag_llm.as_ref().map(|_| "custom".to_string());
        Self {
            embedder,
            rag_llm,
            rag_llm_name,
            clara,
        }
    }

    pub fn embedder(&self) -> Option<Arc<dyn Embedding>> {
        self.embedder.clone()
    }

    pub fn rag_llm(&self) -> Option<SharedLlm> {
        self.rag_llm.clone()
    }

    pub fn clara(&self) -> Option<Arc<ClaraModel>> {
        self.clara.clone()
    }

    pub fn status(&self) -> ModelStatus {
        ModelStatus {
            embedder: self.embedder.is_some(),
            rag_llm: self.rag_llm_name.clone(),
            clara: self.clara.is_some(),
        }
    }

    /// Build every configured model. A broken embedder aborts startup; the
    /// generation models degrade to empty slots with a warning.
    pub async fn load(config: &ModelsConfig) -> Result<Self, RagError> {
        tracing::info!("loading models");

        let embedder = build_embedder(&config.embedder, config.timeout())?;
        if config.probe {
            embedder
                .embed("warmup")
                .await
                .map_err(|err| RagError::Load {
                    model: config.embedder.model.clone(),
                    reason: err.to_string(),
                })?;
        }
        tracing::info!(model = %config.embedder.model, "embedder loaded");

        let (rag_llm, rag_llm_name) = load_rag_llm(config).await;
        let clara = load_clara(config).await;

        tracing::info!(
            rag_llm = rag_llm_name.as_deref().unwrap_or("<none>"),
            clara = clara.is_some(),
            "all models loaded"
        );

        Ok(Self {
            embedder: Some(embedder),
            rag_llm,
            rag_llm_name,
            clara,
        })
    }
}

fn build_embedder(
    config: &EmbedderConfig,
    timeout: Duration,
) -> Result<Arc<dyn Embedding>, RagError> {
    Ok(match config.provider {
        EmbedderProvider::Ollama => Arc::new(
            OllamaEmbedding::new(
                config.base_url.clone(),
                config.model.clone(),
                config.dimension,
            )
            .with_timeout(timeout),
        ),
        EmbedderProvider::OpenaiCompatible => {
            let mut embedder = OpenAiCompatibleEmbedding::new(
                config.base_url.clone(),
                config.model.clone(),
                config.dimension,
            )
            .with_timeout(timeout);
            if let Some(key) = &config.api_key {
                embedder = embedder.with_api_key(key.clone());
            }
            Arc::new(embedder)
        }
        EmbedderProvider::Hash => {
            if config.dimension == 0 {
                return Err(RagError::Load {
                    model: "hash".to_string(),
                    reason: "hash embedder needs a non-zero dimension".to_string(),
                });
            }
            Arc::new(HashEmbedder::new(config.dimension))
        }
    })
}

pub(crate) fn build_llm(config: &LlmConfig, timeout: Duration) -> Result<SharedLlm, RagError> {
    let llm: SharedLlm = match config.provider {
        LlmProvider::Ollama => Arc::new(OllamaClient::with_timeout(
            config.base_url.clone(),
            config.model.clone(),
            timeout,
        )?),
        LlmProvider::OpenaiCompatible => {
            let mut builder = OpenAiCompatibleClient::builder()
                .base_url(config.base_url.clone())
                .model(config.model.clone())
                .timeout(timeout);
            if let Some(key) = &config.api_key {
                builder = builder.api_key(key.clone());
            }
            Arc::new(builder.build()?)
        }
    };
    Ok(llm)
}

fn ping_request() -> LlmRequest {
    LlmRequest::from_prompt(
        "ping",
        GenerationOptions {
            max_new_tokens: 1,
            ..GenerationOptions::default()
        },
    )
}

/// Build and send a one-token request, so a dead backend shows up at startup.
async fn check_llm(config: &LlmConfig, timeout: Duration) -> Result<SharedLlm, RagError> {
    let llm = build_llm(config, timeout)?;
    llm.invoke(ping_request()).await?;
    Ok(llm)
}

async fn load_rag_llm(config: &ModelsConfig) -> (Option<SharedLlm>, Option<String>) {
    let timeout = config.timeout();
    let primary = &config.rag_llm;

    if !config.probe {
        // Without probing, decide per request: primary first, fallback on error.
        let Ok(llm) = build_llm(primary, timeout) else {
            tracing::warn!(model = %primary.model, "could not build RAG LLM");
            return (None, None);
        };
        let fallback = config
            .rag_fallback_llm
            .as_ref()
            .and_then(|fallback| build_llm(fallback, timeout).ok());
        let llm: SharedLlm = match fallback {
            Some(fallback) => Arc::new(RunnableWithFallbacks::new(llm, vec![fallback])),
            None => llm,
        };
        return (Some(llm), Some(primary.model.clone()));
    }

    match check_llm(primary, timeout).await {
        Ok(llm) => {
            tracing::info!(model = %primary.model, "RAG LLM loaded");
            return (Some(llm), Some(primary.model.clone()));
        }
        Err(err) => {
            tracing::warn!(
                model = %primary.model,
                error = %err,
                "could not load RAG LLM, falling back to a smaller model"
            );
        }
    }

    let Some(fallback) = &config.rag_fallback_llm else {
        return (None, None);
    };
    match check_llm(fallback, timeout).await {
        Ok(llm) => {
            tracing::info!(model = %fallback.model, "fallback RAG LLM loaded");
            (Some(llm), Some(fallback.model.clone()))
        }
        Err(err) => {
            tracing::error!(
                model = %fallback.model,
                error = %err,
                "error loading fallback model"
            );
            (None, None)
        }
    }
}

async fn load_clara(config: &ModelsConfig) -> Option<Arc<ClaraModel>> {
    let clara = config.clara.as_ref()?;
    let timeout = config.timeout();

    let built = ClaraClient::with_timeout(clara.base_url.clone(), clara.model.clone(), timeout)
        .map_err(RagError::from)
        .and_then(|client| Ok((client, build_llm(&clara.generation_config(), timeout)?)));
    let (client, generator) = match built {
        Ok(parts) => parts,
        Err(err) => {
            tracing::warn!(model = %clara.model, error = %err, "could not load CLaRa model");
            return None;
        }
    };

    let model = ClaraModel::new(Arc::new(client), generator);
    if config.probe {
        let ping = GenerateFromTextRequest::single("ping", vec!["ping".to_string()], 1);
        match model.entry_point().invoke(ping).await {
            Ok(_) => {}
            Err(err) if err.is_entry_point_unavailable() => {
                tracing::warn!(
                    model = %clara.model,
                    "generate_from_text not served, CLaRa will use plain generation"
                );
                model.mark_entry_point_missing();
                if let Err(err) = model.generator().invoke(ping_request()).await {
                    tracing::warn!(
                        model = %clara.model,
                        error = %err,
                        "could not load CLaRa model"
                    );
                    return None;
                }
            }
            Err(err) => {
                tracing::warn!(model = %clara.model, error = %err, "could not load CLaRa model");
                return None;
            }
        }
    }
    tracing::info!(model = %clara.model, "CLaRa loaded");
    Some(Arc::new(model))
}
