//! Quill Extractor
//!
//! Derives a writing style profile from a handful of text samples using an LLM.
//!
//! # Overview
//!
//! The extractor reads a few sample files, asks the model to describe the
//! author's tone, vocabulary, sentence and paragraph shape, voice, common
//! phrases, structural patterns and representative sentences, and turns the
//! reply into a [`StyleProfile`](quill_domain::StyleProfile). The profile can
//! then be rendered back into prompt text with `to_prompt_text`.
//!
//! # Architecture
//!
//! ```text
//! Samples dir → SampleLoader → PromptBuilder → LLM (retried) → Parser → StyleProfile
//! ```
//!
//! # Key Features
//!
//! - **Bounded input**: at most `max_samples` files, each cut to `max_chars_per_sample`
//! - **Retried invocation**: transport failures are retried with backoff
//! - **Defensive parsing**: prose, code fences and array wrapping are tolerated
//! - **Always usable output**: missing samples, bad replies and missing fields
//!   all degrade to defaults
//!
//! # Example Usage
//!
//! ```no_run
//! use quill_extractor::{StyleExtractor, StyleExtractorConfig};
//! use quill_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = MockProvider::new(r#"{"tone": "conversational"}"#);
//! let extractor = StyleExtractor::new(llm, StyleExtractorConfig::default())?;
//!
//! let profile = extractor.extract_style("~/writings").await?;
//!
//! println!("Tone: {}", profile.tone());
//! println!("{}", profile.to_prompt_text());
//! # Ok(())
//! # }
//! ```
//!
//! Hosts that share components by name can store the extractor or a computed
//! profile in their own registry; nothing here depends on one.

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod parser;
mod prompt;
mod samples;

#[cfg(test)]
mod tests;

pub use config::{StyleExtractorConfig, MAX_RETRIES_LIMIT};
pub use error::{ParseError, StyleExtractionError};
pub use extractor::StyleExtractor;
pub use parser::parse_style_response;
pub use prompt::{PromptBuilder, PROFILE_SCHEMA};
pub use samples::{expand_home, Sample, SampleLoader};

pub use quill_domain::{default_profile, StyleProfile};
