//! Staged streaming pipeline for the search endpoint.
//!
//! The workflow runs as three stages (query generation, search, analysis)
//! and emits one event after each. Every event carries the full accumulated
//! data so far, so a client may act on the latest event alone. Any stage
//! failure emits a final event with a message and ends the stream.

use crate::agent::{SearchAgent, NO_SEARCH};
use crate::analysis::{self, AnalysisRecord};
use crate::explore::SearchResult;
use axum::response::sse::Event;
use futures::Stream;
use serde::{Deserialize, Serialize};

/// Which phase of the workflow an event reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    GenerateQuery,
    Search,
    Analyze,
}

/// Accumulated workflow state carried on every event.
///
/// All fields are always serialized; `null` means "not reached yet" or
/// "not applicable".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageData {
    pub user_query: String,
    pub agent_query: Option<String>,
    pub search_results: Option<Vec<SearchResult>>,
    pub analysis: Option<Vec<AnalysisRecord>>,
    pub analysis_text: Option<String>,
    pub cover_match: Option<String>,
}

impl StageData {
    fn new(user_query: &str) -> Self {
        Self {
            user_query: user_query.to_string(),
            agent_query: None,
            search_results: None,
            analysis: None,
            analysis_text: None,
            cover_match: None,
        }
    }
}

/// One server-sent event of the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageEvent {
    pub stage: Stage,
    pub msg: Option<String>,
    pub data: StageData,
}

impl StageEvent {
    fn progress(stage: Stage, data: &StageData) -> Self {
        Self {
            stage,
            msg: None,
            data: data.clone(),
        }
    }

    fn terminal(stage: Stage, data: &StageData, msg: impl Into<String>) -> Self {
        Self {
            stage,
            msg: Some(msg.into()),
            data: data.clone(),
        }
    }

    /// Encode as an SSE wire event.
    pub fn to_sse(&self) -> Result<Event, serde_json::Error> {
        Ok(Event::default().data(serde_json::to_string(self)?))
    }
}

/// Run the search workflow over `agent`, yielding one event per stage.
///
/// `generate_query = false` skips stage one and searches with the user's
/// query verbatim. `analyze_result = false` ends the stream after the
/// search stage.
pub fn pipeline(
    mut agent: SearchAgent,
    user_query: String,
    limit: usize,
    generate_query: bool,
    analyze_result: bool,
) -> impl Stream<Item = StageEvent> {
    async_stream::stream! {
        let mut data = StageData::new(&user_query);

        // Stage 1: generate the search query.
        if generate_query {
            match agent.generate_search_query(&user_query).await {
                Ok(query) => data.agent_query = Some(query),
                Err(e) => {
                    tracing::error!(error = %e, "failed to generate search query");
                    yield StageEvent::terminal(
                        Stage::GenerateQuery,
                        &data,
                        format!("Query generation failed: {}", e),
                    );
                    return;
                }
            }
            if data.agent_query.as_deref() == Some(NO_SEARCH) {
                yield StageEvent::terminal(
                    Stage::GenerateQuery,
                    &data,
                    "No search needed for this query",
                );
                return;
            }
            yield StageEvent::progress(Stage::GenerateQuery, &data);
        } else {
            data.agent_query = Some(user_query.clone());
            yield StageEvent::terminal(
                Stage::GenerateQuery,
                &data,
                "Using original query (skip generation)",
            );
        }

        // Stage 2: search the backend.
        // agent_query is always set by this point.
        let agent_query = data.agent_query.clone().unwrap_or_default();
        let results = match agent.search(&agent_query, limit).await {
            Ok(results) => {
                data.search_results = Some(results.clone());
                results
            }
            Err(e) => {
                tracing::error!(error = %e, "search failed");
                yield StageEvent::terminal(Stage::Search, &data, format!("Search failed: {}", e));
                return;
            }
        };
        if results.is_empty() {
            yield StageEvent::terminal(Stage::Search, &data, "No result found");
            return;
        }
        yield StageEvent::progress(Stage::Search, &data);

        // Stage 3: analyze the results.
        if !analyze_result {
            return;
        }
        let text = match agent.analyze(&user_query, &agent_query, &results).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(error = %e, "analysis failed");
                yield StageEvent::terminal(Stage::Analyze, &data, format!("Analysis failed: {}", e));
                return;
            }
        };
        data.analysis = Some(analysis::parse_analysis(&text));
        data.cover_match = analysis::extract_cover_match(&text);
        data.analysis_text = Some(text);
        yield StageEvent::progress(Stage::Analyze, &data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explore::{fixtures, ExploreClient};
    use crate::prompts::PromptSet;
    use crate::provider::MockProvider;
    use futures::StreamExt;
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn agent(mock: &MockProvider, client: Option<ExploreClient>) -> SearchAgent {
        SearchAgent::new(Box::new(mock.clone()), client, Arc::new(PromptSet::default()))
    }

    async fn backend_with(results: Vec<serde_json::Value>) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": results})))
            .mount(&server)
            .await;
        server
    }

    async fn collect(stream: impl Stream<Item = StageEvent>) -> Vec<StageEvent> {
        stream.collect().await
    }

    #[tokio::test]
    async fn test_full_pipeline_emits_three_stages() {
        let server = backend_with(vec![fixtures::result_json("Nat.add_comm")]).await;
        let mock = MockProvider::new(vec![
            "commutativity".to_string(),
            "**1. Match**\n\
             - **Lean Name**: `Nat.add_comm`\n\
             - **Type**: theorem\n\
             - **Statement**: `a + b = b + a`\n\
             - **Relevance**: exact\n\
             - **Module**: Mathlib.Algebra\n\
             \nCover match: `Nat.add_comm`\n"
                .to_string(),
        ]);
        let agent = agent(&mock, Some(ExploreClient::new(server.uri(), None)));

        let events = collect(pipeline(agent, "q".to_string(), 10, true, true)).await;
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].stage, Stage::GenerateQuery);
        assert_eq!(events[1].stage, Stage::Search);
        assert_eq!(events[2].stage, Stage::Analyze);
        assert!(events.iter().take(3).all(|e| e.msg.is_none()));

        // Data accumulates monotonically.
        assert_eq!(events[0].data.agent_query.as_deref(), Some("commutativity"));
        assert!(events[0].data.search_results.is_none());
        assert_eq!(events[1].data.search_results.as_ref().map(Vec::len), Some(1));
        assert!(events[1].data.analysis.is_none());
        let last = &events[2].data;
        assert_eq!(last.cover_match.as_deref(), Some("Nat.add_comm"));
        assert_eq!(last.analysis.as_ref().map(Vec::len), Some(1));
        assert!(last.analysis_text.is_some());
    }

    #[tokio::test]
    async fn test_no_search_ends_after_first_stage() {
        let mock = MockProvider::fixed(NO_SEARCH);
        let agent = agent(&mock, None);
        let events = collect(pipeline(agent, "hi".to_string(), 10, true, true)).await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].stage, Stage::GenerateQuery);
        assert_eq!(events[0].msg.as_deref(), Some("No search needed for this query"));
        assert_eq!(events[0].data.agent_query.as_deref(), Some(NO_SEARCH));
    }

    #[tokio::test]
    async fn test_skip_generation_uses_original_query() {
        let server = backend_with(vec![fixtures::result_json("X")]).await;
        let mock = MockProvider::fixed("unused analysis");
        let agent = agent(&mock, Some(ExploreClient::new(server.uri(), None)));

        let events = collect(pipeline(agent, "raw query".to_string(), 10, false, false)).await;
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0].msg.as_deref(),
            Some("Using original query (skip generation)")
        );
        assert_eq!(events[0].data.agent_query.as_deref(), Some("raw query"));
        // analyze_result=false ends the stream after the search stage.
        assert_eq!(events[1].stage, Stage::Search);
        assert!(events[1].msg.is_none());
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_results_terminate_stream() {
        let server = backend_with(vec![]).await;
        let mock = MockProvider::fixed("some query");
        let agent = agent(&mock, Some(ExploreClient::new(server.uri(), None)));

        let events = collect(pipeline(agent, "q".to_string(), 10, true, true)).await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].stage, Stage::Search);
        assert_eq!(events[1].msg.as_deref(), Some("No result found"));
        assert_eq!(events[1].data.search_results.as_ref().map(Vec::len), Some(0));
        // The analyzer is never consulted.
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_search_failure_terminates_with_message() {
        let mock = MockProvider::fixed("some query");
        let agent = agent(&mock, None);
        let events = collect(pipeline(agent, "q".to_string(), 10, true, true)).await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].stage, Stage::Search);
        assert!(events[1].msg.as_deref().unwrap().starts_with("Search failed:"));
    }

    #[test]
    fn test_wire_format() {
        let data = StageData::new("q");
        let event = StageEvent::progress(Stage::GenerateQuery, &data);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["stage"], "generate_query");
        assert_eq!(json["msg"], serde_json::Value::Null);
        assert_eq!(json["data"]["user_query"], "q");
        // Unreached fields are present and null, not omitted.
        assert!(json["data"].as_object().unwrap().contains_key("cover_match"));
    }
}
