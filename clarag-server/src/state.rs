use std::sync::Arc;

use clarag_rag::{ModelRegistry, ModelStatus, QueryService};

use crate::config::ServerConfig;

/// Shared by every handler. Built once after the models are loaded.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub queries: QueryService,
    pub models: ModelStatus,
}

impl AppState {
    pub fn new(config: ServerConfig, registry: &ModelRegistry) -> Self {
        Self {
            queries: QueryService::from_registry(registry, &config.generation),
            models: registry.status(),
            config: Arc::new(config),
        }
    }
}
