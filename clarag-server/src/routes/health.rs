use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::state::AppState;

/// Liveness plus the model slots filled at startup.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "clarag",
        "version": env!("CARGO_PKG_VERSION"),
        "models": state.models,
    }))
}
