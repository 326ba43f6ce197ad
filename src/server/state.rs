//! Application state shared across handlers.

use crate::agent::SearchAgent;
use crate::config::Settings;
use crate::explore::ExploreClient;
use crate::prompts::PromptSet;
use crate::provider::OpenAiProvider;
use reqwest::Client;
use std::sync::Arc;

/// Shared application state.
///
/// Holds only request-independent pieces; everything conversational is
/// built fresh per request by [`search_agent`](Self::search_agent).
#[derive(Clone)]
pub struct AppState {
    /// Global settings.
    pub settings: Arc<Settings>,
    /// Loaded prompt templates.
    pub prompts: Arc<PromptSet>,
    /// Shared HTTP client, reused for connection pooling.
    client: Client,
    api_key: String,
}

impl AppState {
    /// Create new application state. Fails when no LLM credential is
    /// configured.
    pub fn new(settings: Settings, prompts: PromptSet) -> crate::error::Result<Self> {
        let api_key = settings.require_api_key()?.to_string();
        Ok(Self {
            settings: Arc::new(settings),
            prompts: Arc::new(prompts),
            client: Client::new(),
            api_key,
        })
    }

    /// Build a search agent with a fresh provider session for one request.
    pub fn search_agent(&self) -> SearchAgent {
        let provider = OpenAiProvider::new(
            &self.settings.openai_base_url,
            &self.api_key,
            &self.settings.model_name,
        )
        .with_client(self.client.clone());
        let explore = ExploreClient::new(
            &self.settings.lean_explore_base_url,
            self.settings.lean_explore_api_key.clone(),
        )
        .with_client(self.client.clone());
        SearchAgent::new(Box::new(provider), Some(explore), self.prompts.clone())
    }
}
