use clap::Parser;
use clarag_server::{init_tracing, start_server, Cli, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = cli.apply(ServerConfig::load(cli.config.as_deref())?);
    init_tracing(&config.log_level);

    start_server(config).await
}
