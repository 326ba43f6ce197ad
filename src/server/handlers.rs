//! HTTP request handlers.

use super::state::AppState;
use super::stream::pipeline;
use axum::{
    extract::{Query, State},
    response::sse::{Event, Sse},
    Json,
};
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;

/// Query parameters for the search endpoint.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// The user's mathematical question or statement.
    pub q: String,
    /// Maximum number of search results to return.
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Whether to generate a search query before searching.
    #[serde(default = "default_true")]
    pub generate_query: bool,
    /// Whether to analyze the search results.
    #[serde(default = "default_true")]
    pub analyze_result: bool,
}

fn default_limit() -> usize {
    50
}

fn default_true() -> bool {
    true
}

/// Stream the search workflow as server-sent events.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    tracing::info!(q = %params.q, limit = params.limit, "search request");
    let agent = state.search_agent();
    let events = pipeline(
        agent,
        params.q,
        params.limit.max(1),
        params.generate_query,
        params.analyze_result,
    )
    .map(|event| {
        Ok(event
            .to_sse()
            .unwrap_or_else(|e| Event::default().data(format!("{{\"error\":\"{}\"}}", e))))
    });
    Sse::new(events)
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model: String,
}

/// Liveness probe.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        model: state.settings.model_name.clone(),
    })
}
