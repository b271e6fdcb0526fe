use axum::routing::{get, post};
use axum::Router;
use clarag_rag::ModelRegistry;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;
use crate::routes::{api, health, not_found, page};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let timeout = state.config.timeout();

    Router::new()
        .route("/", get(page::index))
        .route("/run", post(page::run))
        .route("/api/query", post(api::query))
        .route("/health", get(health::health_check))
        .fallback(not_found)
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `RUST_LOG` wins; otherwise the configured level.
pub fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Load the models, then serve until Ctrl+C or SIGTERM.
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let registry = ModelRegistry::load(&config.models).await?;
    let state = AppState::new(config, &registry);

    tracing::info!(
        embedder = state.models.embedder,
        rag_llm = state.models.rag_llm.as_deref().unwrap_or("<none>"),
        clara = state.models.clara,
        "models ready"
    );

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "serving clarag demo");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
