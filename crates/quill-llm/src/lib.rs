//! Quill LLM Provider Layer
//!
//! Pluggable LLM provider implementations.
//!
//! # Architecture
//!
//! This crate provides implementations of the `LlmProvider` trait from `quill-domain`.
//! It supports multiple LLM backends with a common interface.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OllamaProvider`: Local Ollama API integration
//! - `OpenAiProvider`: OpenAI-compatible chat completions API
//!
//! # Examples
//!
//! ```
//! use quill_llm::MockProvider;
//! use quill_domain::LlmProvider;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let provider = MockProvider::new("Hello from LLM!");
//! let result = provider.generate("test prompt").await.unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! # }
//! ```

#![warn(missing_docs)]

pub mod ollama;
pub mod openai;

use async_trait::async_trait;
use quill_domain::LlmProvider as LlmProviderTrait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Credentials missing or rejected
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        LlmError::Communication(format!("Request failed: {}", e))
    }
}

type MockReply = Result<String, String>;

#[derive(Debug, Default)]
struct MockState {
    responses: HashMap<String, MockReply>,
    queued: VecDeque<MockReply>,
    prompts: Vec<String>,
    schemas: Vec<String>,
}

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls.
/// Lookup order for each call: the next queued reply, then a reply registered
/// for the exact prompt, then the default response.
///
/// # Examples
///
/// ```
/// use quill_llm::MockProvider;
/// use quill_domain::LlmProvider;
///
/// # #[tokio::main]
/// # async fn main() {
/// // Multiple responses
/// let provider = MockProvider::default()
///     .with_response("prompt1", "response1")
///     .with_response("prompt2", "response2");
/// assert_eq!(provider.generate("prompt1").await.unwrap(), "response1");
/// assert_eq!(provider.generate("prompt2").await.unwrap(), "response2");
///
/// // Scripted sequence: fail once, then answer
/// let provider = MockProvider::new("fallback");
/// provider.queue_error("connection reset");
/// provider.queue_response("{}");
/// assert!(provider.generate("x").await.is_err());
/// assert_eq!(provider.generate("x").await.unwrap(), "{}");
/// assert_eq!(provider.generate("x").await.unwrap(), "fallback");
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    state: Arc<Mutex<MockState>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Add a specific response for a given prompt
    pub fn with_response(self, prompt: impl Into<String>, response: impl Into<String>) -> Self {
        self.state().responses.insert(prompt.into(), Ok(response.into()));
        self
    }

    /// Configure to return an error for a specific prompt
    pub fn with_error(self, prompt: impl Into<String>) -> Self {
        self.state()
            .responses
            .insert(prompt.into(), Err("Mock error".to_string()));
        self
    }

    /// Queue a response for the next unanswered call
    pub fn queue_response(&self, response: impl Into<String>) {
        self.state().queued.push_back(Ok(response.into()));
    }

    /// Queue a failure for the next unanswered call
    pub fn queue_error(&self, message: impl Into<String>) {
        self.state().queued.push_back(Err(message.into()));
    }

    /// Get the number of times the provider was called
    pub fn call_count(&self) -> usize {
        self.state().prompts.len()
    }

    /// Every prompt received, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.state().prompts.clone()
    }

    /// The most recent prompt received
    pub fn last_prompt(&self) -> Option<String> {
        self.state().prompts.last().cloned()
    }

    /// Schemas passed to `generate_structured`, in call order
    pub fn schemas(&self) -> Vec<String> {
        self.state().schemas.clone()
    }

    /// Reset the call history
    pub fn reset_call_count(&self) {
        let mut state = self.state();
        state.prompts.clear();
        state.schemas.clear();
    }

    // A panicking test thread must not poison the mock for the others
    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn reply(&self, prompt: &str) -> Result<String, LlmError> {
        let mut state = self.state();
        state.prompts.push(prompt.to_string());

        let reply = state
            .queued
            .pop_front()
            .or_else(|| state.responses.get(prompt).cloned())
            .unwrap_or_else(|| Ok(self.default_response.clone()));

        reply.map_err(LlmError::Other)
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

#[async_trait]
impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        self.reply(prompt)
    }

    async fn generate_structured(&self, prompt: &str, schema: &str) -> Result<String, Self::Error> {
        self.state().schemas.push(schema.to_string());
        self.reply(prompt)
    }
}
