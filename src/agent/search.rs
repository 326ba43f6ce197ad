//! Theorem-search agent.
//!
//! Three-phase workflow over the Lean Explore API: generate a search query
//! from the user's question, search, then ask the model which hit (if any)
//! covers the question. Each phase is terminal on failure; nothing is
//! retried.

use super::ChatAgent;
use crate::analysis::{self, AnalysisRecord};
use crate::error::{AgentError, Result};
use crate::explore::{ExploreClient, SearchResult};
use crate::prompts::PromptSet;
use crate::provider::{GenerateConfig, Provider};
use serde::Serialize;
use std::sync::Arc;

/// Sentinel reply meaning the question does not call for a search.
/// Matched exactly and case-sensitively.
pub const NO_SEARCH: &str = "NO_SEARCH";

/// Aggregate outcome of the full search workflow.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    /// The user's original question.
    pub user_query: String,
    /// The query actually sent to the search backend (or `NO_SEARCH`).
    pub search_query: String,
    /// Retrieved hits, already truncated to the caller's limit.
    pub results: Vec<SearchResult>,
    /// The model's free-text analysis.
    pub analysis: String,
    /// Structured records extracted from the analysis.
    pub records: Vec<AnalysisRecord>,
    /// Which declaration, if any, the model says covers the question.
    pub cover_match: Option<String>,
}

/// Agent specialized in searching formalized mathematics.
pub struct SearchAgent {
    chat: ChatAgent,
    client: Option<ExploreClient>,
    prompts: Arc<PromptSet>,
}

impl SearchAgent {
    /// Create the agent over `provider`. `client` may be absent; query
    /// generation still works, searching fails with a clear error.
    pub fn new(
        provider: Box<dyn Provider>,
        client: Option<ExploreClient>,
        prompts: Arc<PromptSet>,
    ) -> Self {
        Self {
            chat: ChatAgent::new(provider, "LeanSearchAgent", None),
            client,
            prompts,
        }
    }

    /// Access the underlying conversation.
    pub fn chat(&self) -> &ChatAgent {
        &self.chat
    }

    /// Whether the search client is configured.
    pub fn client_ready(&self) -> bool {
        self.client.is_some()
    }

    /// Phase 1: ask the model for a search query. Returns the trimmed reply,
    /// which may be the [`NO_SEARCH`] sentinel.
    pub async fn generate_search_query(&mut self, user_query: &str) -> Result<String> {
        let prompt = format!(
            "{}\n\nUser query: {}",
            self.prompts.create_search_query, user_query
        );
        let response = self
            .chat
            .send_message(prompt, &GenerateConfig::default())
            .await?;
        Ok(response.trim().to_string())
    }

    /// Phase 2: search the backend, truncating to `limit` client-side.
    ///
    /// The remote API applies its own ceiling; it is not assumed to match.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        let client = self.client.as_ref().ok_or_else(|| {
            AgentError::SearchUnavailable("search client is not configured".to_string())
        })?;
        let mut results = client.search(query).await?;
        results.truncate(limit);
        Ok(results)
    }

    /// Phase 3: ask the model which hit covers the question. Returns the
    /// free-text analysis.
    pub async fn analyze(
        &mut self,
        user_query: &str,
        search_query: &str,
        results: &[SearchResult],
    ) -> Result<String> {
        let mut prompt = self.prompts.identify_search_result.clone();
        prompt.push_str("\n\n");
        prompt.push_str(&format!("**User Query**: {}\n", user_query));
        prompt.push_str(&format!("**Search Query**: {}\n\n", search_query));
        prompt.push_str("**Search Results**:\n");
        prompt.push_str(&format_results(search_query, results));
        prompt.push_str(
            "\n\nPlease analyze these results and provide your response in the specified format.",
        );

        self.chat.send_message(prompt, &GenerateConfig::default()).await
    }

    /// Complete workflow: generate query, search, analyze, extract.
    ///
    /// A [`NO_SEARCH`] reply short-circuits with an empty outcome and zero
    /// calls to the search backend.
    pub async fn run(&mut self, user_query: &str, limit: usize) -> Result<SearchOutcome> {
        tracing::info!(agent = self.chat.agent_id(), "generating search query");
        let search_query = self.generate_search_query(user_query).await?;

        if search_query == NO_SEARCH {
            tracing::info!("no search needed for this query");
            return Ok(SearchOutcome {
                user_query: user_query.to_string(),
                search_query,
                results: Vec::new(),
                analysis: "No search needed for this query".to_string(),
                records: Vec::new(),
                cover_match: None,
            });
        }

        tracing::info!(query = %search_query, "searching");
        let results = self.search(&search_query, limit).await?;
        tracing::info!(count = results.len(), "search returned");

        let analysis = self.analyze(user_query, &search_query, &results).await?;
        let records = analysis::parse_analysis(&analysis);
        let cover_match = analysis::extract_cover_match(&analysis);

        Ok(SearchOutcome {
            user_query: user_query.to_string(),
            search_query,
            results,
            analysis,
            records,
            cover_match,
        })
    }
}

/// Serialize hits into the fixed textual template the analysis prompt
/// expects: index, declaration name, file:line, statement, docstring,
/// description.
pub fn format_results(search_query: &str, results: &[SearchResult]) -> String {
    let mut text = format!("Search Query: {}\n", search_query);
    text.push_str(&format!("Total Found: {} results\n\n", results.len()));
    text.push_str(&format!("SEARCH RESULTS ({} total):\n", results.len()));

    for (i, item) in results.iter().enumerate() {
        text.push_str(&format!("\n{}. {}\n", i + 1, item.lean_name()));
        text.push_str(&format!(
            "   File: {}:{}\n",
            item.source_file, item.range_start_line
        ));
        if let Some(ref statement) = item.display_statement_text {
            text.push_str(&format!("   Statement: {}\n", statement));
        }
        if let Some(ref docstring) = item.docstring {
            text.push_str(&format!("   Docstring: {}\n", docstring));
        }
        if let Some(ref description) = item.informal_description {
            text.push_str(&format!("   Description: {}\n", description));
        }
    }

    text
}
