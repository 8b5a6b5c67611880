//! LLM prompt engineering for style extraction

use crate::samples::Sample;

/// JSON schema of the expected reply, passed to structured generation
pub const PROFILE_SCHEMA: &str = r#"{
  "type": "object",
  "properties": {
    "tone": {"type": "string"},
    "vocabulary_level": {"type": "string"},
    "sentence_structure": {"type": "string"},
    "paragraph_length": {"type": "string"},
    "voice": {"type": "string"},
    "common_phrases": {"type": "array", "items": {"type": "string"}},
    "writing_patterns": {"type": "array", "items": {"type": "string"}},
    "examples": {"type": "array", "items": {"type": "string"}}
  },
  "required": ["tone", "vocabulary_level", "sentence_structure", "paragraph_length", "voice",
               "common_phrases", "writing_patterns", "examples"]
}"#;

/// Longest excerpt of a bad reply quoted back to the model
const FEEDBACK_EXCERPT_CHARS: usize = 500;

/// Builds prompts for the LLM to extract a style profile
pub struct PromptBuilder<'a> {
    samples: &'a [Sample],
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(samples: &'a [Sample]) -> Self {
        Self { samples }
    }

    /// Samples joined with file-boundary delimiters
    pub fn combined_samples(&self) -> String {
        self.samples
            .iter()
            .map(|s| format!("=== {} ===\n{}", s.name, s.content))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(ANALYST_ROLE);
        prompt.push_str("\n\n");

        prompt.push_str("Analyze these writing samples to extract the author's style:\n\n");
        prompt.push_str(&self.combined_samples());
        prompt.push_str("\n\n");

        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\n");
        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        prompt
    }

    /// Build the corrective follow-up sent after an unparseable reply
    pub fn build_feedback(&self, previous_reply: &str, error: &str) -> String {
        let excerpt: String = previous_reply.chars().take(FEEDBACK_EXCERPT_CHARS).collect();

        let mut prompt = self.build();
        prompt.push_str("\n\nYour previous reply could not be used.\n");
        prompt.push_str(&format!("Problem: {}\n", error));
        prompt.push_str("Previous reply:\n---\n");
        prompt.push_str(&excerpt);
        prompt.push_str("\n---\n\n");
        prompt.push_str(
            "Reply again with exactly one JSON object containing all eight fields. \
             No prose, no markdown, no array.",
        );
        prompt
    }
}

const ANALYST_ROLE: &str =
    "You are an expert writing style analyst. Extract detailed style characteristics from text samples.";

const EXTRACTION_INSTRUCTIONS: &str = r#"Extract:
1. Overall tone (formal/casual/technical/conversational)
2. Vocabulary complexity level (simple/moderate/advanced)
3. Typical sentence structure patterns
4. Paragraph length preference (short/medium/long)
5. Voice preference (active/passive/mixed)
6. Common phrases or expressions (list, most characteristic first)
7. Recurring writing patterns (list)
8. 3-5 example sentences that best capture the style (list)"#;

const OUTPUT_FORMAT_REMINDER: &str = r#"Output format (a single JSON object, no additional text):
{
  "tone": "...",
  "vocabulary_level": "...",
  "sentence_structure": "...",
  "paragraph_length": "...",
  "voice": "...",
  "common_phrases": ["..."],
  "writing_patterns": ["..."],
  "examples": ["..."]
}

Remember: Return ONLY valid JSON, no markdown code blocks, no explanations."#;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample(name: &str, content: &str) -> Sample {
        Sample {
            name: name.to_string(),
            relative_path: PathBuf::from(name),
            content: content.to_string(),
            truncated: false,
        }
    }

    #[test]
    fn test_combined_samples_delimiters() {
        let samples = vec![sample("a.md", "First."), sample("b.md", "Second.")];
        let combined = PromptBuilder::new(&samples).combined_samples();
        assert_eq!(combined, "=== a.md ===\nFirst.\n\n=== b.md ===\nSecond.");
    }

    #[test]
    fn test_prompt_includes_samples_and_fields() {
        let samples = vec![sample("post.md", "I love short, punchy sentences. Always.")];
        let prompt = PromptBuilder::new(&samples).build();

        assert!(prompt.contains("=== post.md ==="));
        assert!(prompt.contains("I love short, punchy sentences. Always."));
        for field in [
            "tone",
            "vocabulary_level",
            "sentence_structure",
            "paragraph_length",
            "voice",
            "common_phrases",
            "writing_patterns",
            "examples",
        ] {
            assert!(prompt.contains(field), "prompt missing {}", field);
        }
    }

    #[test]
    fn test_feedback_prompt_quotes_error_and_reply() {
        let samples = vec![sample("a.md", "Text.")];
        let builder = PromptBuilder::new(&samples);
        let feedback = builder.build_feedback("Sure! Here is the style.", "No JSON payload found");

        assert!(feedback.starts_with(&builder.build()));
        assert!(feedback.contains("Problem: No JSON payload found"));
        assert!(feedback.contains("Sure! Here is the style."));
    }

    #[test]
    fn test_feedback_excerpt_is_bounded() {
        let samples = vec![sample("a.md", "Text.")];
        let long_reply = "x".repeat(5_000);
        let feedback = PromptBuilder::new(&samples).build_feedback(&long_reply, "bad");
        assert!(!feedback.contains(&"x".repeat(FEEDBACK_EXCERPT_CHARS + 1)));
        assert!(feedback.contains(&"x".repeat(FEEDBACK_EXCERPT_CHARS)));
    }

    #[test]
    fn test_schema_is_valid_json() {
        let schema: serde_json::Value = serde_json::from_str(PROFILE_SCHEMA).unwrap();
        assert_eq!(schema["required"].as_array().unwrap().len(), 8);
    }
}
