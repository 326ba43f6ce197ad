//! LLM provider abstraction.
//!
//! The [`Provider`] trait is a small closed capability set — send a message
//! within a session, generate a stateless single turn, upload a file, reset
//! the session. Implementations translate those calls into provider-specific
//! HTTP APIs; callers never see transport details.
//!
//! Built-in implementations: [`OpenAiProvider`] for any OpenAI-compatible
//! endpoint, [`MockProvider`] for tests. The variant is selected at
//! construction time from configuration.

pub mod mock;
pub mod openai;

pub use mock::MockProvider;
pub use openai::OpenAiProvider;

use crate::error::Result;
use crate::message::{Content, FileHandle};
use async_trait::async_trait;
use serde_json::Value;

/// Per-call generation configuration.
///
/// # Example
///
/// ```
/// use blueprint_agent::provider::GenerateConfig;
///
/// let config = GenerateConfig::default()
///     .with_temperature(0.3)
///     .with_web_search(true);
/// ```
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Temperature (0.0 = deterministic, 1.0 = creative).
    pub temperature: f64,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Enable the provider's web-search tool, if it has one.
    pub web_search: bool,
    /// Custom fields merged into the request body as-is.
    pub extra: Option<Value>,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 8192,
            web_search: false,
            extra: None,
        }
    }
}

impl GenerateConfig {
    pub fn with_temperature(mut self, temp: f64) -> Self {
        self.temperature = temp;
        self
    }

    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = tokens;
        self
    }

    pub fn with_web_search(mut self, enabled: bool) -> Self {
        self.web_search = enabled;
        self
    }

    pub fn with_extra(mut self, extra: Value) -> Self {
        self.extra = Some(extra);
        self
    }
}

/// Abstraction over LLM providers.
///
/// `send_message` operates on the provider's internal session transcript;
/// `generate_content` is a stateless single turn. All methods return
/// `Result` — failures are never swallowed into sentinel values.
///
/// # Object Safety
///
/// The trait is object-safe and designed to be used as `Box<dyn Provider>`,
/// with each agent owning its own provider instance (and therefore its own
/// session state).
#[async_trait]
pub trait Provider: Send + Sync {
    /// Send a message in the current session and return the model's reply.
    ///
    /// The message and reply are appended to the provider's session
    /// transcript.
    async fn send_message(&mut self, content: &Content, config: &GenerateConfig)
        -> Result<String>;

    /// Generate a reply for a single turn without touching session state.
    async fn generate_content(&self, content: &Content, config: &GenerateConfig)
        -> Result<String>;

    /// Upload a file and return a handle usable in message content.
    async fn upload_file(&mut self, path: &str) -> Result<FileHandle>;

    /// Clear the session transcript, optionally re-seeding a system prompt.
    fn reset(&mut self, system_prompt: Option<&str>);

    /// Human-readable name for logging.
    fn name(&self) -> &'static str;
}
