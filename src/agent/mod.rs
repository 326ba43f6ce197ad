//! Agent layer: conversation-holding workflows on top of a provider.
//!
//! [`ChatAgent`] is the shared core — it owns a boxed provider and an
//! append-only conversation log. The workflow agents
//! ([`BlueprintAgent`](blueprint::BlueprintAgent),
//! [`SearchAgent`](search::SearchAgent)) compose it rather than inherit
//! from it.

pub mod blueprint;
pub mod search;

pub use blueprint::{BlueprintAgent, BlueprintOptions};
pub use search::{SearchAgent, SearchOutcome, NO_SEARCH};

use crate::error::Result;
use crate::message::{Content, Entry, FileHandle, Role};
use crate::provider::{GenerateConfig, Provider};

/// A provider session paired with its conversation log.
///
/// The log is append-only and owned exclusively by this agent; entries are
/// immutable once recorded and survive until [`reset_session`](Self::reset_session).
pub struct ChatAgent {
    provider: Box<dyn Provider>,
    agent_id: String,
    system_prompt: Option<String>,
    history: Vec<Entry>,
}

impl ChatAgent {
    /// Create an agent over `provider`, seeding the optional system prompt
    /// into the log and the provider session.
    pub fn new(
        mut provider: Box<dyn Provider>,
        agent_id: impl Into<String>,
        system_prompt: Option<String>,
    ) -> Self {
        let mut history = Vec::new();
        if let Some(ref prompt) = system_prompt {
            history.push(Entry::new(Role::System, prompt.as_str()));
            provider.reset(Some(prompt));
        }
        Self {
            provider,
            agent_id: agent_id.into(),
            system_prompt,
            history,
        }
    }

    /// The agent's identifier, used in log events.
    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    /// The provider's name, for logging.
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Send a message in the session and record both sides in the log.
    pub async fn send_message(
        &mut self,
        content: impl Into<Content>,
        config: &GenerateConfig,
    ) -> Result<String> {
        let content = content.into();
        self.history.push(Entry::new(Role::User, content.clone()));
        let response = self.provider.send_message(&content, config).await?;
        self.history
            .push(Entry::new(Role::Assistant, response.as_str()));
        Ok(response)
    }

    /// Single stateless turn; still recorded in the log.
    pub async fn generate_content(
        &mut self,
        content: impl Into<Content>,
        config: &GenerateConfig,
    ) -> Result<String> {
        let content = content.into();
        self.history.push(Entry::new(Role::User, content.clone()));
        let response = self.provider.generate_content(&content, config).await?;
        self.history
            .push(Entry::new(Role::Assistant, response.as_str()));
        Ok(response)
    }

    /// Upload a file, then send a confirmation message referencing it.
    pub async fn upload_file(&mut self, path: &str) -> Result<FileHandle> {
        let file = self.provider.upload_file(path).await?;
        let content = Content::WithFiles {
            text: format!("This is {}. If you can see the file, response 'OK'", path),
            files: vec![file.clone()],
        };
        self.send_message(content, &GenerateConfig::default()).await?;
        Ok(file)
    }

    /// The complete conversation log.
    pub fn history(&self) -> &[Entry] {
        &self.history
    }

    /// The most recent assistant response, if any.
    pub fn last_assistant(&self) -> Option<&str> {
        self.history
            .iter()
            .rev()
            .find(|e| e.role == Role::Assistant)
            .map(|e| e.content.text())
    }

    /// Clear the session, keeping only the system prompt.
    pub fn reset_session(&mut self) {
        self.history.clear();
        if let Some(ref prompt) = self.system_prompt {
            self.history.push(Entry::new(Role::System, prompt.as_str()));
        }
        self.provider.reset(self.system_prompt.as_deref());
    }
}

impl std::fmt::Debug for ChatAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatAgent")
            .field("agent_id", &self.agent_id)
            .field("provider", &self.provider.name())
            .field("history_len", &self.history.len())
            .finish()
    }
}
