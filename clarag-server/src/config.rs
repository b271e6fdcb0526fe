use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use clarag_rag::{GenerationSettings, ModelsConfig};
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "clarag";

/// Prefix of the environment overrides, e.g. `CLARAG__PORT=8080` or
/// `CLARAG__MODELS__RAG_LLM__MODEL=llama3.2`.
pub const ENV_PREFIX: &str = "CLARAG";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Fallback filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Upper bound for a whole request, generation included.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Largest top-K the page and the API accept.
    #[serde(default = "default_max_top_k")]
    pub max_top_k: usize,

    #[serde(default)]
    pub models: ModelsConfig,

    #[serde(default)]
    pub generation: GenerationSettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            log_level: default_log_level(),
            timeout_secs: default_timeout_secs(),
            max_top_k: default_max_top_k(),
            models: ModelsConfig::default(),
            generation: GenerationSettings::default(),
        }
    }
}

impl ServerConfig {
    /// Layer built-in defaults, then the config file (optional unless a path
    /// is given), then `CLARAG__*` environment variables. Each layer may set
    /// a single nested key.
    pub fn load(path: Option<&Path>) -> ServerResult<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config = config::Config::builder()
            .add_source(config::Config::try_from(&ServerConfig::default())?)
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<ServerConfig>()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ServerResult<()> {
        if self.max_top_k == 0 {
            return Err(ServerError::Config("max_top_k must be at least 1".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(ServerError::Config("timeout_secs must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> ServerResult<SocketAddr> {
        Ok(format!("{}:{}", self.bind_addr, self.port).parse()?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Clamp a requested top-K into `1..=max_top_k`.
    pub fn clamp_top_k(&self, top_k: usize) -> usize {
        top_k.clamp(1, self.max_top_k.max(1))
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    7860
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_max_top_k() -> usize {
    5
}
