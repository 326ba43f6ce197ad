//! Process-wide configuration.
//!
//! [`Settings`] is read once at startup from the environment and is immutable
//! thereafter. Defaults cover local development; the only hard requirement
//! for serving is an LLM API key, checked at startup rather than on the
//! first request.

use crate::error::{AgentError, Result};

/// Immutable process configuration.
///
/// Shared across requests behind an `Arc`; nothing here is mutated after
/// startup.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Server bind host. Default: `0.0.0.0`.
    pub server_host: String,
    /// Server bind port. Default: `8000`.
    pub server_port: u16,
    /// Base URL of the Lean Explore search API.
    pub lean_explore_base_url: String,
    /// Optional Lean Explore API key (sent as a bearer token).
    pub lean_explore_api_key: Option<String>,
    /// LLM API key. Required to serve.
    pub openai_api_key: Option<String>,
    /// Base URL for the OpenAI-compatible LLM endpoint.
    pub openai_base_url: String,
    /// Model identifier passed to the LLM endpoint.
    pub model_name: String,
    /// Directory containing the prompt template files.
    pub prompts_dir: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 8000,
            lean_explore_base_url: "http://localhost:8000/api/v1".to_string(),
            lean_explore_api_key: None,
            openai_api_key: None,
            openai_base_url: "https://openrouter.ai/api/v1".to_string(),
            model_name: "google/gemini-2.5-flash".to_string(),
            prompts_dir: "prompts".to_string(),
        }
    }
}

impl Settings {
    /// Build settings from defaults overlaid with environment variables.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        settings.merge_env();
        settings
    }

    /// Overlay environment variables onto the current values.
    ///
    /// Empty variables are ignored. An unparseable `SERVER_PORT` keeps the
    /// current value.
    pub fn merge_env(&mut self) {
        if let Some(host) = env_var("SERVER_HOST") {
            self.server_host = host;
        }
        if let Some(port) = env_var("SERVER_PORT") {
            if let Ok(port) = port.parse() {
                self.server_port = port;
            }
        }
        if let Some(url) = env_var("LEAN_EXPLORE_BASE_URL") {
            self.lean_explore_base_url = url;
        }
        if let Some(key) = env_var("LEAN_EXPLORE_API_KEY") {
            self.lean_explore_api_key = Some(key);
        }
        if let Some(key) = env_var("OPENAI_API_KEY") {
            self.openai_api_key = Some(key);
        }
        if let Some(url) = env_var("OPENAI_BASE_URL") {
            self.openai_base_url = url;
        }
        if let Some(model) = env_var("MODEL_NAME") {
            self.model_name = model;
        }
        if let Some(dir) = env_var("PROMPTS_DIR") {
            self.prompts_dir = dir;
        }
    }

    /// Return the configured API key, or fail if none is set.
    ///
    /// Called once at startup so a misconfigured process never starts serving.
    pub fn require_api_key(&self) -> Result<&str> {
        self.openai_api_key.as_deref().ok_or_else(|| {
            AgentError::MissingCredentials("OPENAI_API_KEY is not set".to_string())
        })
    }

    /// The socket address string to bind the server to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

/// Read an environment variable, treating empty values as unset.
fn env_var(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}
