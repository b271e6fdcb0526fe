use std::path::PathBuf;

use clap::Parser;

use crate::config::ServerConfig;

/// Serve the CLaRa vs Normal RAG comparison page.
#[derive(Debug, Parser)]
#[command(name = "clarag", version, about)]
pub struct Cli {
    /// TOML/YAML/JSON config file. Defaults to `clarag.*` in the working directory.
    #[arg(long, env = "CLARAG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to bind, overrides the config file.
    #[arg(long)]
    pub bind: Option<String>,

    #[arg(long, short)]
    pub port: Option<u16>,

    /// Start without sending warm-up requests to the model backends.
    #[arg(long)]
    pub no_probe: bool,
}

impl Cli {
    /// Flags win over file and environment values.
    pub fn apply(&self, mut config: ServerConfig) -> ServerConfig {
        if let Some(bind) = &self.bind {
            config.bind_addr = bind.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if self.no_probe {
            config.models.probe = false;
        }
        config
    }
}
