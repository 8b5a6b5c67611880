//! Style profile - the value object produced by style extraction

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum common phrases rendered by [`StyleProfile::to_prompt_text`]
pub const PROMPT_PHRASE_LIMIT: usize = 5;

/// Maximum example sentences rendered by [`StyleProfile::to_prompt_text`]
pub const PROMPT_EXAMPLE_LIMIT: usize = 3;

const DEFAULT_TONE: &str = "conversational";
const DEFAULT_VOCABULARY_LEVEL: &str = "moderate";
const DEFAULT_SENTENCE_STRUCTURE: &str = "varied";
const DEFAULT_PARAGRAPH_LENGTH: &str = "medium";
const DEFAULT_VOICE: &str = "active";
const DEFAULT_COMMON_PHRASES: &[&str] = &["in practice"];
const DEFAULT_WRITING_PATTERNS: &[&str] = &["introduction-body-conclusion", "problem-solution"];
const DEFAULT_EXAMPLES: &[&str] = &[
    "Clear and direct communication.",
    "Focus on practical value.",
];

/// Author style profile extracted from writing samples
///
/// Captures the characteristics of an author's writing so later generation
/// can match it. Every text field is non-empty and every list field is
/// present (possibly empty). Fields are read-only; the `with_*` methods
/// consume the profile and return a new one.
///
/// The wire form is a flat JSON object keyed by field name. Deserialization
/// goes through [`StyleProfileDraft`], so missing fields take their defaults.
///
/// # Examples
///
/// ```
/// use quill_domain::StyleProfile;
///
/// let profile = StyleProfile::new("conversational", "moderate", "short and direct", "medium", "active")
///     .with_common_phrases(vec!["in other words".into(), "as it turns out".into()]);
///
/// assert_eq!(profile.tone(), "conversational");
/// assert_eq!(profile.common_phrases().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "StyleProfileDraft")]
pub struct StyleProfile {
    tone: String,
    vocabulary_level: String,
    sentence_structure: String,
    paragraph_length: String,
    voice: String,
    common_phrases: Vec<String>,
    writing_patterns: Vec<String>,
    examples: Vec<String>,
}

/// A profile under construction, every field optional
///
/// Converting into [`StyleProfile`] fills each absent or blank field from
/// the default profile independently of the others.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleProfileDraft {
    /// Overall tone
    pub tone: Option<String>,
    /// Vocabulary complexity
    pub vocabulary_level: Option<String>,
    /// Typical sentence patterns
    pub sentence_structure: Option<String>,
    /// Paragraph length preference
    pub paragraph_length: Option<String>,
    /// Active vs passive voice preference
    pub voice: Option<String>,
    /// Frequently used phrases
    pub common_phrases: Option<Vec<String>>,
    /// Structural patterns
    pub writing_patterns: Option<Vec<String>>,
    /// Example sentences
    pub examples: Option<Vec<String>>,
}

impl StyleProfile {
    /// Create a profile from its descriptors, with empty phrase, pattern and example lists
    ///
    /// Blank descriptors are replaced by the default profile's value.
    pub fn new(
        tone: impl Into<String>,
        vocabulary_level: impl Into<String>,
        sentence_structure: impl Into<String>,
        paragraph_length: impl Into<String>,
        voice: impl Into<String>,
    ) -> Self {
        StyleProfileDraft {
            tone: Some(tone.into()),
            vocabulary_level: Some(vocabulary_level.into()),
            sentence_structure: Some(sentence_structure.into()),
            paragraph_length: Some(paragraph_length.into()),
            voice: Some(voice.into()),
            common_phrases: Some(Vec::new()),
            writing_patterns: Some(Vec::new()),
            examples: Some(Vec::new()),
        }
        .into()
    }

    /// Replace the common phrases
    pub fn with_common_phrases(mut self, phrases: Vec<String>) -> Self {
        self.common_phrases = phrases;
        self
    }

    /// Replace the writing patterns
    pub fn with_writing_patterns(mut self, patterns: Vec<String>) -> Self {
        self.writing_patterns = patterns;
        self
    }

    /// Replace the example sentences
    pub fn with_examples(mut self, examples: Vec<String>) -> Self {
        self.examples = examples;
        self
    }

    /// Overall tone (e.g. "formal", "conversational")
    pub fn tone(&self) -> &str {
        &self.tone
    }

    /// Vocabulary complexity (e.g. "simple", "advanced")
    pub fn vocabulary_level(&self) -> &str {
        &self.vocabulary_level
    }

    /// Typical sentence shape
    pub fn sentence_structure(&self) -> &str {
        &self.sentence_structure
    }

    /// Typical paragraph size
    pub fn paragraph_length(&self) -> &str {
        &self.paragraph_length
    }

    /// Active vs passive voice preference
    pub fn voice(&self) -> &str {
        &self.voice
    }

    /// Frequently used phrases, most salient first
    pub fn common_phrases(&self) -> &[String] {
        &self.common_phrases
    }

    /// Recurring structural patterns
    pub fn writing_patterns(&self) -> &[String] {
        &self.writing_patterns
    }

    /// Sentences that illustrate the style
    pub fn examples(&self) -> &[String] {
        &self.examples
    }

    /// Render the profile as prose guidance for a generation prompt
    ///
    /// Deterministic. Only the first [`PROMPT_PHRASE_LIMIT`] phrases and the
    /// first [`PROMPT_EXAMPLE_LIMIT`] examples are included; empty lists
    /// are omitted.
    ///
    /// # Examples
    ///
    /// ```
    /// use quill_domain::StyleProfile;
    ///
    /// let text = StyleProfile::new("conversational", "moderate", "short and direct", "medium", "active")
    ///     .to_prompt_text();
    ///
    /// assert!(text.contains("conversational tone"));
    /// assert!(text.contains("moderate vocabulary"));
    /// ```
    pub fn to_prompt_text(&self) -> String {
        let mut parts = vec![
            format!("Write with a {} tone.", self.tone),
            format!("Use {} vocabulary level.", self.vocabulary_level),
            format!("Structure sentences: {}.", self.sentence_structure),
            format!("Prefer {} paragraphs.", self.paragraph_length),
            format!("Use {} voice.", self.voice),
        ];

        if !self.common_phrases.is_empty() {
            let phrases = self
                .common_phrases
                .iter()
                .take(PROMPT_PHRASE_LIMIT)
                .map(|p| format!("\"{}\"", p))
                .collect::<Vec<_>>()
                .join(", ");
            parts.push(format!("Common phrases include: {}.", phrases));
        }

        if !self.writing_patterns.is_empty() {
            parts.push(format!(
                "Follow these patterns: {}.",
                self.writing_patterns.join(", ")
            ));
        }

        if !self.examples.is_empty() {
            parts.push("Example style:".to_string());
            for example in self.examples.iter().take(PROMPT_EXAMPLE_LIMIT) {
                parts.push(format!("  - \"{}\"", example));
            }
        }

        parts.join("\n")
    }

    /// Serialize to the flat JSON wire form
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to indented JSON
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse the flat JSON wire form
    ///
    /// Strict about JSON syntax and field types; missing fields are defaulted.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for StyleProfile {
    /// The fallback profile used when no samples exist or extraction cannot complete
    fn default() -> Self {
        Self {
            tone: DEFAULT_TONE.to_string(),
            vocabulary_level: DEFAULT_VOCABULARY_LEVEL.to_string(),
            sentence_structure: DEFAULT_SENTENCE_STRUCTURE.to_string(),
            paragraph_length: DEFAULT_PARAGRAPH_LENGTH.to_string(),
            voice: DEFAULT_VOICE.to_string(),
            common_phrases: owned(DEFAULT_COMMON_PHRASES),
            writing_patterns: owned(DEFAULT_WRITING_PATTERNS),
            examples: owned(DEFAULT_EXAMPLES),
        }
    }
}

/// The fixed fallback profile
pub fn default_profile() -> StyleProfile {
    StyleProfile::default()
}

impl From<StyleProfileDraft> for StyleProfile {
    fn from(draft: StyleProfileDraft) -> Self {
        Self {
            tone: text_or(draft.tone, DEFAULT_TONE),
            vocabulary_level: text_or(draft.vocabulary_level, DEFAULT_VOCABULARY_LEVEL),
            sentence_structure: text_or(draft.sentence_structure, DEFAULT_SENTENCE_STRUCTURE),
            paragraph_length: text_or(draft.paragraph_length, DEFAULT_PARAGRAPH_LENGTH),
            voice: text_or(draft.voice, DEFAULT_VOICE),
            common_phrases: draft
                .common_phrases
                .unwrap_or_else(|| owned(DEFAULT_COMMON_PHRASES)),
            writing_patterns: draft
                .writing_patterns
                .unwrap_or_else(|| owned(DEFAULT_WRITING_PATTERNS)),
            examples: draft.examples.unwrap_or_else(|| owned(DEFAULT_EXAMPLES)),
        }
    }
}

impl From<StyleProfile> for StyleProfileDraft {
    fn from(profile: StyleProfile) -> Self {
        Self {
            tone: Some(profile.tone),
            vocabulary_level: Some(profile.vocabulary_level),
            sentence_structure: Some(profile.sentence_structure),
            paragraph_length: Some(profile.paragraph_length),
            voice: Some(profile.voice),
            common_phrases: Some(profile.common_phrases),
            writing_patterns: Some(profile.writing_patterns),
            examples: Some(profile.examples),
        }
    }
}

impl fmt::Display for StyleProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_prompt_text())
    }
}

fn text_or(value: Option<String>, default: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => default.to_string(),
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: serializing and parsing back yields an equal profile
        #[test]
        fn test_json_round_trip_property(
            tone in "[a-z ]{1,20}",
            voice in "\\PC{0,20}",
            phrases in proptest::collection::vec("\\PC{0,30}", 0..6),
            examples in proptest::collection::vec("\\PC{0,60}", 0..4),
        ) {
            let profile = StyleProfile::new(tone, "moderate", "varied", "medium", voice)
                .with_common_phrases(phrases)
                .with_examples(examples);

            let json = profile.to_json().unwrap();
            prop_assert_eq!(StyleProfile::from_json(&json).unwrap(), profile);
        }

        /// Property: rendering never fails and is deterministic
        #[test]
        fn test_prompt_text_deterministic_property(
            tone in "\\PC{0,20}",
            patterns in proptest::collection::vec("\\PC{0,30}", 0..8),
        ) {
            let profile = StyleProfile::new(tone, "simple", "short", "short", "active")
                .with_writing_patterns(patterns);
            let first = profile.to_prompt_text();
            prop_assert_eq!(first, profile.clone().to_prompt_text());
        }
    }
}
