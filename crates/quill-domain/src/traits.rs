//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use async_trait::async_trait;

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (quill-llm). Implementations must
/// be safe to share between concurrent extractions.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Error type for LLM operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Generate text completion
    async fn generate(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Generate with structured output (if supported)
    ///
    /// `schema` is a JSON schema describing the expected object. Providers
    /// without a JSON mode fall back to plain generation.
    async fn generate_structured(&self, prompt: &str, schema: &str) -> Result<String, Self::Error> {
        let _ = schema;
        self.generate(prompt).await
    }
}
