//! Integration tests for the StyleExtractor

#[cfg(test)]
mod tests {
    use crate::{default_profile, StyleExtractionError, StyleExtractor, StyleExtractorConfig};
    use quill_llm::MockProvider;
    use std::fs;
    use std::path::Path;

    const PUNCHY_REPLY: &str = r#"[{"tone":"punchy","vocabulary_level":"simple","sentence_structure":"short","paragraph_length":"short","voice":"active","common_phrases":["I love"],"writing_patterns":["short sentences"],"examples":["I love short, punchy sentences."]}]"#;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    fn test_config() -> StyleExtractorConfig {
        StyleExtractorConfig {
            retry_backoff_ms: 1,
            ..Default::default()
        }
    }

    fn extractor(llm: &MockProvider) -> StyleExtractor<MockProvider> {
        StyleExtractor::new(llm.clone(), test_config()).unwrap()
    }

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[tokio::test]
    async fn test_full_extraction_flow() {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "post.md", "I love short, punchy sentences. Always.");

        let llm = MockProvider::new(PUNCHY_REPLY);
        let profile = extractor(&llm).extract_style(dir.path()).await.unwrap();

        assert_eq!(profile.tone(), "punchy");
        assert_eq!(profile.common_phrases(), ["I love".to_string()]);
        assert_eq!(profile.writing_patterns(), ["short sentences".to_string()]);
        assert_eq!(llm.call_count(), 1);

        let prompt = llm.last_prompt().unwrap();
        assert!(prompt.contains("=== post.md ==="));
        assert!(prompt.contains("I love short, punchy sentences. Always."));
    }

    #[tokio::test]
    async fn test_empty_directory_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "notes.txt", "not a markdown sample");

        let llm = MockProvider::new(PUNCHY_REPLY);
        let profile = extractor(&llm).extract_style(dir.path()).await.unwrap();

        assert_eq!(profile, default_profile());
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_truncation_bounds_prompt_contribution() {
        let dir = tempfile::tempdir().unwrap();
        let body = format!("{}{}", "a".repeat(3_000), "b".repeat(2_000));
        write(dir.path(), "long.md", &body);

        let llm = MockProvider::new(PUNCHY_REPLY);
        extractor(&llm).extract_style(dir.path()).await.unwrap();

        let prompt = llm.last_prompt().unwrap();
        assert!(prompt.contains(&"a".repeat(3_000)));
        assert!(!prompt.contains(&"b".repeat(10)));
    }

    #[tokio::test]
    async fn test_sample_count_limit() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..8 {
            write(dir.path(), &format!("sample_{}.md", i), &format!("Body of sample {}.", i));
        }

        let llm = MockProvider::new(PUNCHY_REPLY);
        extractor(&llm).extract_style(dir.path()).await.unwrap();

        let prompt = llm.last_prompt().unwrap();
        for i in 0..5 {
            assert!(prompt.contains(&format!("=== sample_{}.md ===", i)));
        }
        for i in 5..8 {
            assert!(!prompt.contains(&format!("sample_{}.md", i)));
        }
    }

    #[tokio::test]
    async fn test_prose_wrapped_reply() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.md", "Some text.");

        let llm = MockProvider::new(format!(
            "Sure! Here's the profile:\n```json\n{}\n```\nHope this helps.",
            PUNCHY_REPLY
        ));
        let profile = extractor(&llm).extract_style(dir.path()).await.unwrap();
        assert_eq!(profile.tone(), "punchy");
    }

    #[tokio::test]
    async fn test_retry_then_success() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.md", "Some text.");

        let llm = MockProvider::new(PUNCHY_REPLY);
        llm.queue_error("503 service unavailable");

        let profile = extractor(&llm).extract_style(dir.path()).await.unwrap();
        assert_eq!(profile.tone(), "punchy");
        assert_eq!(llm.call_count(), 2);
    }

    #[tokio::test]
    async fn test_invocation_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.md", "Some text.");

        let llm = MockProvider::default();
        for _ in 0..10 {
            llm.queue_error("unauthorized");
        }
        let config = StyleExtractorConfig {
            max_retries: 1,
            ..test_config()
        };
        let extractor = StyleExtractor::new(llm.clone(), config).unwrap();

        let result = extractor.extract_style(dir.path()).await;
        assert!(matches!(
            result,
            Err(StyleExtractionError::Llm { attempts: 2, .. })
        ));
        assert_eq!(llm.call_count(), 2);
    }

    #[tokio::test]
    async fn test_corrective_follow_up_recovers() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.md", "Some text.");

        let llm = MockProvider::new(PUNCHY_REPLY);
        llm.queue_response("I think the author is rather punchy.");

        let profile = extractor(&llm).extract_style(dir.path()).await.unwrap();
        assert_eq!(profile.tone(), "punchy");
        assert_eq!(llm.call_count(), 2);

        let follow_up = llm.last_prompt().unwrap();
        assert!(follow_up.contains("Your previous reply could not be used."));
        assert!(follow_up.contains("I think the author is rather punchy."));
    }

    #[tokio::test]
    async fn test_unparseable_replies_fall_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.md", "Some text.");

        let llm = MockProvider::new("This is not JSON");
        let profile = extractor(&llm).extract_style(dir.path()).await.unwrap();

        assert_eq!(profile, default_profile());
        assert_eq!(llm.call_count(), 2);
    }

    #[tokio::test]
    async fn test_no_follow_up_when_disabled() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.md", "Some text.");

        let llm = MockProvider::new("[]");
        let config = StyleExtractorConfig {
            parse_feedback_retries: 0,
            ..test_config()
        };
        let extractor = StyleExtractor::new(llm.clone(), config).unwrap();

        let profile = extractor.extract_style(dir.path()).await.unwrap();
        assert_eq!(profile, default_profile());
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_follow_up_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.md", "Some text.");

        let llm = MockProvider::default();
        llm.queue_response("garbage");
        for _ in 0..3 {
            llm.queue_error("connection reset");
        }

        let profile = extractor(&llm).extract_style(dir.path()).await.unwrap();
        assert_eq!(profile, default_profile());
        assert_eq!(llm.call_count(), 4);
    }

    #[tokio::test]
    async fn test_partial_reply_defaults_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.md", "Some text.");

        let llm = MockProvider::new(r#"{"tone":"wry","voice":"passive"}"#);
        let profile = extractor(&llm).extract_style(dir.path()).await.unwrap();
        let defaults = default_profile();

        assert_eq!(profile.tone(), "wry");
        assert_eq!(profile.voice(), "passive");
        assert_eq!(profile.vocabulary_level(), defaults.vocabulary_level());
        assert_eq!(profile.examples(), defaults.examples());
    }

    #[tokio::test]
    async fn test_concurrent_extractions_share_extractor() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        write(first.path(), "a.md", "One.");
        write(second.path(), "b.md", "Two.");

        let llm = MockProvider::new(PUNCHY_REPLY);
        let extractor = extractor(&llm);

        let (a, b) = tokio::join!(
            extractor.extract_style(first.path()),
            extractor.extract_style(second.path())
        );
        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(llm.call_count(), 2);
    }

    #[tokio::test]
    async fn test_profile_renders_for_generation() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.md", "Some text.");

        let llm = MockProvider::new(PUNCHY_REPLY);
        let profile = extractor(&llm).extract_style(dir.path()).await.unwrap();
        let text = profile.to_prompt_text();

        assert!(text.contains("Write with a punchy tone."));
        assert!(text.contains("\"I love\""));
        assert!(text.contains("  - \"I love short, punchy sentences.\""));
        assert_eq!(text, profile.to_prompt_text());
    }
}
