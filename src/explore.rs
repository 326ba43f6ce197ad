//! Client for the Lean Explore theorem-search API.
//!
//! A thin call-through: one GET per search, no retries, no caching. Results
//! are external read-only entities; this module only deserializes them.

use crate::error::{AgentError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// The declaration a search hit primarily refers to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrimaryDeclaration {
    /// Fully qualified Lean name (e.g. `Nat.add_comm`).
    pub lean_name: Option<String>,
}

/// One hit returned by the search API. Read-only to this system.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub primary_declaration: Option<PrimaryDeclaration>,
    /// Source file the declaration lives in.
    #[serde(default)]
    pub source_file: String,
    /// First line of the declaration in the source file.
    #[serde(default)]
    pub range_start_line: u32,
    /// Pretty-printed statement text, if available.
    #[serde(default)]
    pub display_statement_text: Option<String>,
    /// Docstring attached to the declaration, if any.
    #[serde(default)]
    pub docstring: Option<String>,
    /// Informal (natural-language) description, if any.
    #[serde(default)]
    pub informal_description: Option<String>,
}

impl SearchResult {
    /// The declaration name, or `"N/A"` when the hit has none.
    pub fn lean_name(&self) -> &str {
        self.primary_declaration
            .as_ref()
            .and_then(|d| d.lean_name.as_deref())
            .unwrap_or("N/A")
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

/// HTTP client wrapper for the search API.
///
/// # Example
///
/// ```no_run
/// use blueprint_agent::explore::ExploreClient;
///
/// let client = ExploreClient::new("http://localhost:8000/api/v1", None);
/// ```
#[derive(Debug, Clone)]
pub struct ExploreClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl ExploreClient {
    /// Create a client for the API at `base_url`.
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Use a shared HTTP client instead of a new one.
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Whether an API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Run a search and return all hits the backend sent back.
    ///
    /// The backend applies its own result ceiling; callers that want a hard
    /// cap truncate after retrieval.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let url = format!("{}/search", self.base_url);
        let mut req = self.client.get(&url).query(&[("q", query)]);
        if let Some(ref key) = self.api_key {
            req = req.header("Authorization", format!("Bearer {}", key));
        }

        let resp = req.send().await.map_err(|e| {
            AgentError::SearchUnavailable(format!("failed to reach {}: {}", url, e))
        })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(AgentError::HttpError {
                status: status.as_u16(),
                body: text,
            });
        }

        let body: SearchResponse = resp.json().await?;
        Ok(body.results)
    }
}
