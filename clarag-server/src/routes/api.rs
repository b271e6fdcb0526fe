use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use clarag_core::Evidence;
use clarag_rag::format::format_outcome;
use clarag_rag::QueryRequest;
use serde::Serialize;

use crate::error::ServerResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct QueryResponse {
    /// What the page shows in its result panel.
    pub markdown: String,
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<Evidence>,
}

pub async fn query(
    State(state): State<AppState>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> ServerResult<Json<QueryResponse>> {
    let Json(mut request) = payload?;
    request.top_k = state.config.clamp_top_k(request.top_k);

    let outcome = state.queries.run(&request).await;
    Ok(Json(QueryResponse {
        markdown: format_outcome(&outcome),
        answer: outcome.answer,
        evidence: outcome.evidence,
    }))
}
