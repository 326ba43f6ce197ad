//! Conversation entries and content types.
//!
//! A conversation is an append-only ordered sequence of role-tagged
//! [`Entry`] values owned exclusively by its agent. Entries are immutable
//! once created and survive until an explicit session reset.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The role of a conversation entry's author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions.
    System,
    /// User input.
    User,
    /// Assistant (model) response.
    Assistant,
    /// Tool output.
    Tool,
}

/// Handle to a file uploaded to a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHandle {
    /// Provider-assigned file identifier.
    pub id: String,
    /// Local path the file was uploaded from.
    pub path: String,
}

/// Entry content: plain text, or text accompanied by uploaded files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    /// Plain text.
    Text(String),
    /// Text plus attached file references.
    WithFiles {
        text: String,
        files: Vec<FileHandle>,
    },
}

impl Content {
    /// The textual portion of the content.
    pub fn text(&self) -> &str {
        match self {
            Content::Text(t) => t,
            Content::WithFiles { text, .. } => text,
        }
    }

    /// Attached file handles, if any.
    pub fn files(&self) -> &[FileHandle] {
        match self {
            Content::Text(_) => &[],
            Content::WithFiles { files, .. } => files,
        }
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::Text(text)
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::Text(text.to_string())
    }
}

/// A single entry in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    /// Author role.
    pub role: Role,
    /// Entry content.
    pub content: Content,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
    /// Opaque metadata attached at creation.
    pub metadata: Value,
}

impl Entry {
    /// Create an entry timestamped now with empty metadata.
    pub fn new(role: Role, content: impl Into<Content>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
            metadata: Value::Object(Default::default()),
        }
    }

    /// Create an entry carrying metadata.
    pub fn with_metadata(role: Role, content: impl Into<Content>, metadata: Value) -> Self {
        Self {
            metadata,
            ..Self::new(role, content)
        }
    }
}
