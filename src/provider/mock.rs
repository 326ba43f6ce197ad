//! Mock provider for testing without a live LLM.
//!
//! [`MockProvider`] returns canned responses in order and records every call.
//! Clones share state, so a test can hand one clone to an agent and keep
//! another to assert on call counts and prompts afterwards.

use super::{GenerateConfig, Provider};
use crate::error::Result;
use crate::message::{Content, FileHandle};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug)]
struct Inner {
    responses: Vec<String>,
    index: AtomicUsize,
    calls: Mutex<Vec<String>>,
    resets: AtomicUsize,
}

/// A test provider that returns canned responses in order.
///
/// Cycles back to the beginning when all responses have been consumed.
/// Sent prompts are recorded for assertion.
#[derive(Debug, Clone)]
pub struct MockProvider {
    inner: Arc<Inner>,
}

impl MockProvider {
    /// Create a mock with the given canned responses, returned in order.
    pub fn new(responses: Vec<String>) -> Self {
        assert!(
            !responses.is_empty(),
            "MockProvider requires at least one response"
        );
        Self {
            inner: Arc::new(Inner {
                responses,
                index: AtomicUsize::new(0),
                calls: Mutex::new(Vec::new()),
                resets: AtomicUsize::new(0),
            }),
        }
    }

    /// Create a mock that always returns the same response.
    pub fn fixed(response: impl Into<String>) -> Self {
        Self::new(vec![response.into()])
    }

    /// Number of send/generate calls made so far.
    pub fn call_count(&self) -> usize {
        self.inner.calls.lock().unwrap().len()
    }

    /// The prompts sent so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.inner.calls.lock().unwrap().clone()
    }

    /// Number of session resets.
    pub fn reset_count(&self) -> usize {
        self.inner.resets.load(Ordering::Relaxed)
    }

    fn next_response(&self, prompt: &str) -> String {
        self.inner.calls.lock().unwrap().push(prompt.to_string());
        let idx = self.inner.index.fetch_add(1, Ordering::Relaxed) % self.inner.responses.len();
        self.inner.responses[idx].clone()
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn send_message(
        &mut self,
        content: &Content,
        _config: &GenerateConfig,
    ) -> Result<String> {
        Ok(self.next_response(content.text()))
    }

    async fn generate_content(
        &self,
        content: &Content,
        _config: &GenerateConfig,
    ) -> Result<String> {
        Ok(self.next_response(content.text()))
    }

    async fn upload_file(&mut self, path: &str) -> Result<FileHandle> {
        Ok(FileHandle {
            id: format!("mock-file-{}", self.call_count()),
            path: path.to_string(),
        })
    }

    fn reset(&mut self, _system_prompt: Option<&str>) {
        self.inner.resets.fetch_add(1, Ordering::Relaxed);
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
