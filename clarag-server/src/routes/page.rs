use axum::extract::{Form, State};
use axum::response::Html;
use clarag_rag::QueryRequest;

use crate::page::{empty_form, render_page};
use crate::state::AppState;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_page(&empty_form(), state.config.max_top_k, None))
}

/// The Run button: answer the query and re-render with the inputs kept.
pub async fn run(
    State(state): State<AppState>,
    Form(mut form): Form<QueryRequest>,
) -> Html<String> {
    form.top_k = state.config.clamp_top_k(form.top_k);
    let markdown = state.queries.process_query(&form).await;
    Html(render_page(&form, state.config.max_top_k, Some(&markdown)))
}
