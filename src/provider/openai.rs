//! Provider for OpenAI-compatible APIs.
//!
//! Covers OpenAI, OpenRouter, vLLM, llama.cpp server, LM Studio, Together AI,
//! Groq, Mistral, and anything else that speaks `/chat/completions`.
//!
//! Session state lives here: the provider keeps the chat transcript it has
//! sent so far and replays it on every `send_message`, since the wire
//! protocol is stateless.

use super::{GenerateConfig, Provider};
use crate::error::{AgentError, Result};
use crate::message::{Content, FileHandle, Role};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

/// Provider for any OpenAI-compatible API.
///
/// # Example
///
/// ```no_run
/// use blueprint_agent::provider::OpenAiProvider;
///
/// let provider = OpenAiProvider::new(
///     "https://openrouter.ai/api/v1",
///     "sk-...",
///     "google/gemini-2.5-flash",
/// );
/// ```
pub struct OpenAiProvider {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    /// Session transcript replayed on each chat call.
    history: Vec<(Role, String)>,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("base_url", &self.base_url)
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .field("history_len", &self.history.len())
            .finish()
    }
}

fn redact(key: &str) -> String {
    if key.len() > 6 {
        format!("{}***", &key[..6])
    } else {
        "***".to_string()
    }
}

impl OpenAiProvider {
    /// Create a provider with a fresh session.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            history: Vec::new(),
        }
    }

    /// Use a shared HTTP client instead of a new one.
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// The model identifier requests are issued for.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Number of entries in the session transcript.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Flatten content into a single chat message body.
    ///
    /// Chat-completions APIs take no file parts, so attachments are inlined
    /// as reference lines after the text.
    fn flatten(content: &Content) -> String {
        let files = content.files();
        if files.is_empty() {
            return content.text().to_string();
        }
        let mut text = content.text().to_string();
        for file in files {
            text.push_str(&format!("\n[attached file {}: {}]", file.id, file.path));
        }
        text
    }

    fn role_str(role: Role) -> &'static str {
        match role {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }

    /// Build the request body for `/chat/completions`.
    fn build_body(&self, messages: Vec<Value>, config: &GenerateConfig) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": messages,
            "temperature": config.temperature,
            "max_tokens": config.max_tokens,
        });

        if config.web_search {
            // OpenRouter's web plugin; other backends ignore unknown fields.
            body["plugins"] = json!([{"id": "web"}]);
        }

        if let (Some(Value::Object(extra)), Some(obj)) = (&config.extra, body.as_object_mut()) {
            for (k, v) in extra {
                obj.insert(k.clone(), v.clone());
            }
        }

        body
    }

    /// POST the body and extract the first choice's message content.
    async fn chat(&self, body: &Value) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(body)
            .send()
            .await
            .map_err(|e| {
                AgentError::Other(format!("Failed to connect to LLM at {}: {}", url, e))
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(AgentError::HttpError {
                status: status.as_u16(),
                body: text,
            });
        }

        let json_resp: Value = resp.json().await?;
        json_resp
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| AgentError::EmptyResponse {
                provider: "openai",
                message: "response carried no choices[0].message.content".to_string(),
            })
    }

    fn messages_json(&self) -> Vec<Value> {
        self.history
            .iter()
            .map(|(role, content)| json!({"role": Self::role_str(*role), "content": content}))
            .collect()
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    async fn send_message(
        &mut self,
        content: &Content,
        config: &GenerateConfig,
    ) -> Result<String> {
        let text = Self::flatten(content);
        self.history.push((Role::User, text));

        let body = self.build_body(self.messages_json(), config);
        // On failure the user turn stays in the transcript: the message was
        // delivered but unanswered, as in a live chat session.
        let reply = self.chat(&body).await?;
        self.history.push((Role::Assistant, reply.clone()));
        Ok(reply)
    }

    async fn generate_content(
        &self,
        content: &Content,
        config: &GenerateConfig,
    ) -> Result<String> {
        let messages = vec![json!({"role": "user", "content": Self::flatten(content)})];
        let body = self.build_body(messages, config);
        self.chat(&body).await
    }

    async fn upload_file(&mut self, path: &str) -> Result<FileHandle> {
        let bytes = tokio::fs::read(path).await.map_err(|e| AgentError::Io {
            path: path.to_string(),
            source: e,
        })?;
        let file_name = std::path::Path::new(path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();

        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
        let form = reqwest::multipart::Form::new()
            .text("purpose", "assistants")
            .part("file", part);

        let url = format!("{}/files", self.base_url);
        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                AgentError::Other(format!("Failed to upload file to {}: {}", url, e))
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(AgentError::HttpError {
                status: status.as_u16(),
                body: text,
            });
        }

        let json_resp: Value = resp.json().await?;
        let id = json_resp
            .get("id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AgentError::EmptyResponse {
                provider: "openai",
                message: "file upload response carried no id".to_string(),
            })?
            .to_string();

        Ok(FileHandle {
            id,
            path: path.to_string(),
        })
    }

    fn reset(&mut self, system_prompt: Option<&str>) {
        self.history.clear();
        if let Some(prompt) = system_prompt {
            self.history.push((Role::System, prompt.to_string()));
        }
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn chat_response(content: &str) -> Value {
        json!({
            "id": "chatcmpl-1",
            "choices": [{"message": {"role": "assistant", "content": content}}],
            "usage": {"total_tokens": 10}
        })
    }

    #[test]
    fn test_build_body_basic() {
        let provider = OpenAiProvider::new("http://x", "sk-test", "gpt-4o");
        let messages = vec![json!({"role": "user", "content": "hi"})];
        let body = provider.build_body(messages, &GenerateConfig::default());
        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["temperature"], 0.7);
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert!(body.get("plugins").is_none());
    }

    #[test]
    fn test_build_body_web_search() {
        let provider = OpenAiProvider::new("http://x", "sk-test", "gpt-4o");
        let config = GenerateConfig::default().with_web_search(true);
        let body = provider.build_body(Vec::new(), &config);
        assert_eq!(body["plugins"][0]["id"], "web");
    }

    #[test]
    fn test_build_body_extra_merged() {
        let provider = OpenAiProvider::new("http://x", "sk-test", "gpt-4o");
        let config = GenerateConfig::default().with_extra(json!({"top_p": 0.5}));
        let body = provider.build_body(Vec::new(), &config);
        assert_eq!(body["top_p"], 0.5);
    }

    #[test]
    fn test_flatten_with_files() {
        let content = Content::WithFiles {
            text: "check this".to_string(),
            files: vec![FileHandle {
                id: "file-9".to_string(),
                path: "proof.pdf".to_string(),
            }],
        };
        let flat = OpenAiProvider::flatten(&content);
        assert!(flat.starts_with("check this"));
        assert!(flat.contains("[attached file file-9: proof.pdf]"));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let provider = OpenAiProvider::new("http://x", "sk-1234567890", "gpt-4o");
        let out = format!("{:?}", provider);
        assert!(!out.contains("1234567890"));
        assert!(out.contains("***"));
    }

    #[tokio::test]
    async fn test_send_message_appends_history() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_response("4")))
            .mount(&server)
            .await;

        let mut provider = OpenAiProvider::new(server.uri(), "sk-test", "test-model");
        let reply = provider
            .send_message(&Content::from("What is 2+2?"), &GenerateConfig::default())
            .await
            .unwrap();
        assert_eq!(reply, "4");
        // user + assistant
        assert_eq!(provider.history_len(), 2);
    }

    #[tokio::test]
    async fn test_send_message_replays_history() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_response("ok")))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        let mut provider = OpenAiProvider::new(server.uri(), "sk-test", "test-model");
        provider.reset(Some("Be brief."));
        provider
            .send_message(&Content::from("first"), &GenerateConfig::default())
            .await
            .unwrap();

        // Second call must carry system + first exchange + new message.
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({
                "messages": [
                    {"role": "system", "content": "Be brief."},
                    {"role": "user", "content": "first"},
                    {"role": "assistant", "content": "ok"},
                    {"role": "user", "content": "second"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_response("ok again")))
            .mount(&server)
            .await;

        let reply = provider
            .send_message(&Content::from("second"), &GenerateConfig::default())
            .await
            .unwrap();
        assert_eq!(reply, "ok again");
    }

    #[tokio::test]
    async fn test_generate_content_is_stateless() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_response("stateless")))
            .mount(&server)
            .await;

        let provider = OpenAiProvider::new(server.uri(), "sk-test", "test-model");
        let reply = provider
            .generate_content(&Content::from("one shot"), &GenerateConfig::default())
            .await
            .unwrap();
        assert_eq!(reply, "stateless");
        assert_eq!(provider.history_len(), 0);
    }

    #[tokio::test]
    async fn test_http_error_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let mut provider = OpenAiProvider::new(server.uri(), "sk-test", "test-model");
        let err = provider
            .send_message(&Content::from("hi"), &GenerateConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::HttpError { status: 429, .. }));
    }

    #[tokio::test]
    async fn test_reset_clears_history() {
        let mut provider = OpenAiProvider::new("http://x", "sk-test", "test-model");
        provider.reset(Some("system"));
        assert_eq!(provider.history_len(), 1);
        provider.reset(None);
        assert_eq!(provider.history_len(), 0);
    }

    #[tokio::test]
    async fn test_upload_file_returns_handle() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/files"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"id": "file-abc123"})),
            )
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("notes.pdf");
        std::fs::write(&file_path, b"pdf bytes").unwrap();

        let mut provider = OpenAiProvider::new(server.uri(), "sk-test", "test-model");
        let handle = provider
            .upload_file(file_path.to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(handle.id, "file-abc123");
        assert!(handle.path.ends_with("notes.pdf"));
    }

    #[tokio::test]
    async fn test_upload_missing_file_is_io_error() {
        let mut provider = OpenAiProvider::new("http://x", "sk-test", "test-model");
        let err = provider.upload_file("/no/such/file.pdf").await.unwrap_err();
        assert!(matches!(err, AgentError::Io { .. }));
    }
}
