//! Core StyleExtractor implementation

use crate::config::StyleExtractorConfig;
use crate::error::StyleExtractionError;
use crate::parser::parse_style_response;
use crate::prompt::{PromptBuilder, PROFILE_SCHEMA};
use crate::samples::{expand_home, Sample, SampleLoader};
use quill_domain::{default_profile, LlmProvider, StyleProfile};
use std::path::Path;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// The StyleExtractor turns a directory of writing samples into a style profile
///
/// Holds no per-extraction state, so one instance can serve concurrent calls.
pub struct StyleExtractor<L>
where
    L: LlmProvider,
{
    llm_provider: Arc<L>,
    loader: SampleLoader,
    config: StyleExtractorConfig,
}

impl<L> StyleExtractor<L>
where
    L: LlmProvider,
{
    /// Create a new StyleExtractor
    pub fn new(llm_provider: L, config: StyleExtractorConfig) -> Result<Self, StyleExtractionError> {
        Self::from_shared(Arc::new(llm_provider), config)
    }

    /// Create a StyleExtractor around a provider shared with other components
    pub fn from_shared(
        llm_provider: Arc<L>,
        config: StyleExtractorConfig,
    ) -> Result<Self, StyleExtractionError> {
        config.validate().map_err(StyleExtractionError::Config)?;
        let loader = SampleLoader::new(&config).map_err(StyleExtractionError::Config)?;

        Ok(Self {
            llm_provider,
            loader,
            config,
        })
    }

    /// The active configuration
    pub fn config(&self) -> &StyleExtractorConfig {
        &self.config
    }

    /// Extract a style profile from the writing samples in `samples_dir`
    ///
    /// A missing or empty directory yields the default profile without
    /// calling the model. An unusable model reply also yields the default
    /// profile. Only a model that cannot be invoked is an error.
    pub async fn extract_style(
        &self,
        samples_dir: impl AsRef<Path>,
    ) -> Result<StyleProfile, StyleExtractionError> {
        let samples_dir = expand_home(samples_dir.as_ref());

        info!("Starting style extraction from {}", samples_dir.display());

        let samples = self.load_samples(&samples_dir).await;
        if samples.is_empty() {
            info!(
                "No writing samples found in {}, using default profile",
                samples_dir.display()
            );
            return Ok(default_profile());
        }

        info!(
            "Loaded {} samples ({} truncated)",
            samples.len(),
            samples.iter().filter(|s| s.truncated).count()
        );

        let prompt_builder = PromptBuilder::new(&samples);
        let prompt = prompt_builder.build();

        debug!("Prompt length: {} chars", prompt.len());

        let mut response = self.call_llm(&prompt).await?;
        let mut feedback_left = self.config.parse_feedback_retries;

        loop {
            debug!("LLM response length: {} chars", response.len());

            let error = match parse_style_response(&response) {
                Ok(profile) => {
                    info!("Style extraction complete: tone '{}'", profile.tone());
                    return Ok(profile);
                }
                Err(e) => e,
            };

            if feedback_left == 0 {
                warn!("Could not parse style response ({}), using default profile", error);
                return Ok(default_profile());
            }
            feedback_left -= 1;

            warn!("Could not parse style response ({}), asking the model to correct it", error);
            let feedback = prompt_builder.build_feedback(&response, &error.to_string());
            response = match self.call_llm(&feedback).await {
                Ok(text) => text,
                Err(e) => {
                    warn!("Corrective request failed ({}), using default profile", e);
                    return Ok(default_profile());
                }
            };
        }
    }

    /// Read samples off the async runtime's worker threads
    async fn load_samples(&self, dir: &Path) -> Vec<Sample> {
        let loader = self.loader.clone();
        let dir = dir.to_path_buf();

        tokio::task::spawn_blocking(move || loader.load(&dir))
            .await
            .unwrap_or_else(|e| {
                warn!("Sample loading task failed: {}", e);
                Vec::new()
            })
    }

    /// Call the LLM provider, retrying failed invocations with backoff
    async fn call_llm(&self, prompt: &str) -> Result<String, StyleExtractionError> {
        let attempts = self.config.max_retries.saturating_add(1);
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            if attempt > 1 {
                let delay = self.config.retry_delay(attempt - 1);
                warn!(
                    "LLM call failed ({}), retry {}/{} in {:?}",
                    last_error,
                    attempt - 1,
                    self.config.max_retries,
                    delay
                );
                tokio::time::sleep(delay).await;
            }

            match timeout(
                self.config.request_timeout(),
                self.llm_provider.generate_structured(prompt, PROFILE_SCHEMA),
            )
            .await
            {
                Ok(Ok(text)) => return Ok(text),
                Ok(Err(e)) => last_error = e.to_string(),
                Err(_) => {
                    last_error = format!(
                        "timed out after {}s",
                        self.config.request_timeout_secs
                    )
                }
            }
        }

        Err(StyleExtractionError::Llm {
            attempts,
            message: last_error,
        })
    }
}

impl<L> Clone for StyleExtractor<L>
where
    L: LlmProvider,
{
    fn clone(&self) -> Self {
        Self {
            llm_provider: Arc::clone(&self.llm_provider),
            loader: self.loader.clone(),
            config: self.config.clone(),
        }
    }
}
