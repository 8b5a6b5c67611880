//! OpenAI-compatible chat completions provider
//!
//! Talks to `{base_url}/chat/completions`. Works with OpenAI itself and with
//! any server exposing the same API.

use crate::LlmError;
use async_trait::async_trait;
use quill_domain::LlmProvider as LlmProviderTrait;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default chat model
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Environment variable consulted when no API key is given
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Provider for OpenAI-compatible chat completion APIs
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    base_url: String,
    model: String,
    api_key: Option<String>,
    system_prompt: Option<String>,
    temperature: Option<f64>,
    client: reqwest::Client,
}

impl OpenAiProvider {
    /// Create a provider for `model`
    ///
    /// `api_key` defaults to the `OPENAI_API_KEY` environment variable. A
    /// missing key is reported as [`LlmError::Authentication`] on first use.
    pub fn new(model: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: model.into(),
            api_key: api_key.or_else(|| std::env::var(API_KEY_ENV).ok()),
            system_prompt: None,
            temperature: None,
            client: build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        }
    }

    /// Create a provider for `gpt-4o` using the environment API key
    pub fn from_env() -> Self {
        Self::new(DEFAULT_MODEL, None)
    }

    /// Point the provider at a different OpenAI-compatible server
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Send `system_prompt` as the system message of every request
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
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

    fn request_body(&self, prompt: &str, json_mode: bool) -> Value {
        let mut messages = Vec::new();
        if let Some(system) = &self.system_prompt {
            messages.push(json!({ "role": "system", "content": system }));
        }
        messages.push(json!({ "role": "user", "content": prompt }));

        let mut body = json!({
            "model": self.model,
            "messages": messages,
        });
        if let Some(temperature) = self.temperature {
            body["temperature"] = json!(temperature);
        }
        if json_mode {
            body["response_format"] = json!({ "type": "json_object" });
        }
        body
    }

    async fn send(&self, prompt: &str, json_mode: bool) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            LlmError::Authentication(format!(
                "API key not set. Set {} or pass api_key to the constructor.",
                API_KEY_ENV
            ))
        })?;

        let url = format!("{}/chat/completions", self.base_url);
        debug!("OpenAI request to {} (model {}, {} chars)", url, self.model, prompt.len());

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&self.request_body(prompt, json_mode))
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        match status {
            s if s.is_success() => parse_completion(&text),
            reqwest::StatusCode::TOO_MANY_REQUESTS => Err(LlmError::RateLimitExceeded),
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                Err(LlmError::Authentication(format!("HTTP {}", status)))
            }
            reqwest::StatusCode::NOT_FOUND => Err(LlmError::ModelNotAvailable(self.model.clone())),
            _ => Err(LlmError::Communication(format!(
                "HTTP {}: {}",
                status,
                truncate(&text, 500)
            ))),
        }
    }
}

fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Extract `choices[0].message.content` from a chat completion body
fn parse_completion(body: &str) -> Result<String, LlmError> {
    let json: Value = serde_json::from_str(body).map_err(|e| {
        LlmError::InvalidResponse(format!(
            "Failed to parse response: {} - Body: {}",
            e,
            truncate(body, 500)
        ))
    })?;

    json.pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| LlmError::InvalidResponse("Missing choices[0].message.content".to_string()))
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[async_trait]
impl LlmProviderTrait for OpenAiProvider {
    type Error = LlmError;

    async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        self.send(prompt, false).await
    }

    async fn generate_structured(&self, prompt: &str, _schema: &str) -> Result<String, Self::Error> {
        self.send(prompt, true).await
    }
}
