//! Configuration for the StyleExtractor

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Upper bound accepted for `max_retries`
pub const MAX_RETRIES_LIMIT: u32 = 10;

/// Configuration for the StyleExtractor
///
/// Missing keys in TOML take their default values.
///
/// # Examples
///
/// ```
/// use quill_extractor::StyleExtractorConfig;
///
/// let config = StyleExtractorConfig::from_toml("max_samples = 3").unwrap();
/// assert_eq!(config.max_samples, 3);
/// assert_eq!(config.max_chars_per_sample, 3_000);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleExtractorConfig {
    /// Maximum number of sample files read per extraction
    pub max_samples: usize,

    /// Characters kept from each sample (straight cut)
    pub max_chars_per_sample: usize,

    /// Glob patterns, relative to the samples directory, selecting sample files
    pub sample_patterns: Vec<String>,

    /// Additional model calls after a failed invocation
    pub max_retries: u32,

    /// Delay before the first retry; doubles on each subsequent retry (milliseconds)
    pub retry_backoff_ms: u64,

    /// Maximum time for a single model call (seconds)
    pub request_timeout_secs: u64,

    /// Corrective follow-up calls made when a reply cannot be parsed
    pub parse_feedback_retries: u32,
}

impl StyleExtractorConfig {
    /// Get the per-call timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Backoff before retry number `retry` (1-based)
    pub fn retry_delay(&self, retry: u32) -> Duration {
        let factor = 2u64.saturating_pow(retry.saturating_sub(1));
        Duration::from_millis(self.retry_backoff_ms.saturating_mul(factor))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_samples == 0 {
            return Err("max_samples must be greater than 0".to_string());
        }
        if self.max_chars_per_sample == 0 {
            return Err("max_chars_per_sample must be greater than 0".to_string());
        }
        if self.sample_patterns.is_empty() {
            return Err("sample_patterns must not be empty".to_string());
        }
        if self.max_retries == 0 {
            return Err("max_retries must be at least 1".to_string());
        }
        if self.max_retries > MAX_RETRIES_LIMIT {
            return Err(format!("max_retries must be at most {}", MAX_RETRIES_LIMIT));
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::from_toml(&contents)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for StyleExtractorConfig {
    fn default() -> Self {
        Self {
            max_samples: 5,
            max_chars_per_sample: 3_000,
            sample_patterns: vec!["**/*.md".to_string()],
            max_retries: 2,
            retry_backoff_ms: 1_000,
            request_timeout_secs: 120,
            parse_feedback_retries: 1,
        }
    }
}
