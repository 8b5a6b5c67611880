//! Quill Domain Layer
//!
//! Core value objects and trait interfaces for writing style extraction.
//!
//! ## Key Concepts
//!
//! - **StyleProfile**: Tone, vocabulary, structure and recurring phrases of an author
//! - **Default profile**: Fixed fallback used when no real signal is available
//! - **LlmProvider**: Boundary to the language model that performs the analysis
//!
//! ## Architecture
//!
//! - Pure value types and rendering only
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod profile;
pub mod traits;

// Re-exports for convenience
pub use profile::{
    default_profile, StyleProfile, StyleProfileDraft, PROMPT_EXAMPLE_LIMIT, PROMPT_PHRASE_LIMIT,
};
pub use traits::LlmProvider;
