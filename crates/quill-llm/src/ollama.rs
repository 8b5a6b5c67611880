//! Ollama Provider Implementation
//!
//! Provides integration with Ollama's local LLM API, for running local
//! models for privacy and cost savings.
//!
//! # Features
//!
//! - Async HTTP communication with Ollama API
//! - Configurable endpoint, model and timeout
//! - JSON mode for structured generation
//!
//! Retries are left to the caller; each `generate` call is one HTTP request.
//!
//! # Examples
//!
//! ```no_run
//! use quill_llm::OllamaProvider;
//! use quill_domain::LlmProvider;
//!
//! # async fn example() -> Result<(), quill_llm::LlmError> {
//! let provider = OllamaProvider::new("http://localhost:11434", "llama3");
//! let text = provider.generate("Say hello").await?;
//! # Ok(())
//! # }
//! ```

use crate::LlmError;
use async_trait::async_trait;
use quill_domain::LlmProvider as LlmProviderTrait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default timeout for LLM requests (120 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Ollama API provider for local LLM inference
#[derive(Debug, Clone)]
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    client: reqwest::Client,
}

/// Request body for Ollama generate API
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'a str>,
}

/// Response from Ollama generate API
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

impl OllamaProvider {
    /// Create a new Ollama provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: Model to use (e.g., "llama3", "mistral")
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            client: build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        }
    }

    /// Create a new Ollama provider at `http://localhost:11434`
    pub fn default_endpoint(model: impl Into<String>) -> Self {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Set the HTTP timeout for each request
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_client(timeout);
        self
    }

    /// Model name sent with each request
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn send(&self, prompt: &str, format: Option<&str>) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.endpoint);

        let request_body = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            format,
        };

        debug!("Ollama request to {} (model {}, {} chars)", url, self.model, prompt.len());

        let response = self.client.post(&url).json(&request_body).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotAvailable(self.model.clone()));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimitExceeded);
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Communication(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body = response
            .json::<OllamaGenerateResponse>()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        Ok(body.response)
    }
}

fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

#[async_trait]
impl LlmProviderTrait for OllamaProvider {
    type Error = LlmError;

    async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        self.send(prompt, None).await
    }

    async fn generate_structured(&self, prompt: &str, _schema: &str) -> Result<String, Self::Error> {
        // Ollama's JSON mode constrains output to a JSON value
        self.send(prompt, Some("json")).await
    }
}
