use thiserror::Error;

/// Errors produced by providers, agents, and the search pipeline.
///
/// Every fallible operation in this crate returns this one error type.
#[derive(Error, Debug)]
pub enum AgentError {
    /// Low-level HTTP transport failure (connection refused, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON parsing failed at the serde level.
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// The backend returned a non-success status code.
    #[error("HTTP {status}: {body}")]
    HttpError {
        /// HTTP status code (e.g. 401, 429, 500).
        status: u16,
        /// Response body text.
        body: String,
    },

    /// The provider answered but the response carried no usable content.
    #[error("Provider '{provider}' returned no content: {message}")]
    EmptyResponse {
        provider: &'static str,
        message: String,
    },

    /// The theorem-search client is not configured or unreachable.
    #[error("Search backend unavailable: {0}")]
    SearchUnavailable(String),

    /// Required credentials were missing at startup.
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// Invalid configuration detected at build time.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// File I/O failure (prompt templates, uploads).
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Catch-all for other errors.
    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for AgentError {
    fn from(err: anyhow::Error) -> Self {
        AgentError::Other(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AgentError>;
