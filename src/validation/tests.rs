use std::sync::Arc;
use std::time::Duration;

use super::*;
use crate::provider::{ProviderError, ProviderRegistry, ReasoningProvider};

fn validator_with(reasoner: ScriptedReasoner) -> (QualityValidator, Arc<ScriptedReasoner>) {
    let reasoner = Arc::new(reasoner);
    let registry = ProviderRegistry::empty().with_reasoner(reasoner.clone());
    (QualityValidator::new(Arc::new(registry)), reasoner)
}

#[test]
fn test_parse_valid_verdict() {
    let verdict = ValidationVerdict::parse(r#"{"is_valid": true, "reason": "clear"}"#);
    assert_eq!(verdict, ValidationVerdict::valid(Some("clear".to_string())));
}

#[test]
fn test_parse_invalid_verdict_keeps_reason() {
    let verdict = ValidationVerdict::parse(r#"{"is_valid": false, "reason": "Incomplete sentence."}"#);
    assert!(!verdict.is_valid);
    assert!(!verdict.malformed);
    assert_eq!(verdict.reason.as_deref(), Some("Incomplete sentence."));
}

#[test]
fn test_parse_reason_is_optional() {
    let verdict = ValidationVerdict::parse(r#"{"is_valid": true}"#);
    assert!(verdict.is_valid);
    assert_eq!(verdict.reason, None);
}

#[test]
fn test_parse_non_string_reason_is_not_malformed() {
    let verdict = ValidationVerdict::parse(r#"{"is_valid": true, "reason": 5}"#);
    assert!(verdict.is_valid);
    assert!(!verdict.malformed);
    assert_eq!(verdict.reason.as_deref(), Some("5"));

    let verdict = ValidationVerdict::parse(r#"{"is_valid": false, "reason": ["vague", "short"]}"#);
    assert!(!verdict.is_valid);
    assert!(!verdict.malformed);
    assert_eq!(verdict.reason.as_deref(), Some(r#"["vague","short"]"#));

    let verdict = ValidationVerdict::parse(r#"{"is_valid": true, "reason": null}"#);
    assert_eq!(verdict.reason, None);
}

#[test]
fn test_parse_strips_markdown_fence() {
    let verdict = ValidationVerdict::parse("```json\n{\"is_valid\": true, \"reason\": \"ok\"}\n```");
    assert!(verdict.is_valid);
    assert!(!verdict.malformed);
}

#[test]
fn test_parse_malformed_answers_fail_closed() {
    for answer in [
        "Sure! The question looks fine.",
        r#"{"reason": "missing field"}"#,
        r#"{"is_valid": "true"}"#,
        r#"{"is_valid": 1}"#,
        "[]",
        "",
    ] {
        let verdict = ValidationVerdict::parse(answer);
        assert!(!verdict.is_valid, "answer {:?} should not validate", answer);
        assert!(verdict.malformed, "answer {:?} should be malformed", answer);
    }
}

#[test]
fn test_user_prompt_quotes_question() {
    assert_eq!(validator_user_prompt("What is X?"), "Question: \"What is X?\"");
}

#[tokio::test]
async fn test_validator_returns_verdict() {
    let (validator, reasoner) =
        validator_with(ScriptedReasoner::verdict(ReasoningProvider::Gemini, false, "gibberish"));

    let verdict = validator
        .validate(ReasoningProvider::Gemini, "gemini-2.0-flash", "asdf qwer")
        .await
        .unwrap();

    assert!(!verdict.is_valid);
    assert_eq!(verdict.reason.as_deref(), Some("gibberish"));
    assert_eq!(reasoner.prompts(), vec!["Question: \"asdf qwer\"".to_string()]);
}

#[tokio::test]
async fn test_validator_malformed_answer_is_not_an_error() {
    let (validator, _) =
        validator_with(ScriptedReasoner::replying(ReasoningProvider::OpenAi, "not json"));

    let verdict = validator
        .validate(ReasoningProvider::OpenAi, "gpt-4o-mini", "What is X?")
        .await
        .unwrap();

    assert!(!verdict.is_valid);
    assert!(verdict.malformed);
}

#[tokio::test]
async fn test_validator_propagates_outage() {
    let (validator, reasoner) =
        validator_with(ScriptedReasoner::failing(ReasoningProvider::DeepSeek, "HTTP 503"));

    let err = validator
        .validate(ReasoningProvider::DeepSeek, "deepseek-chat", "What is X?")
        .await
        .unwrap_err();

    assert!(matches!(err, ReasoningError::Unavailable { .. }));
    assert_eq!(reasoner.call_count(), 1);
}

#[tokio::test]
async fn test_validator_unregistered_provider_is_configuration_error() {
    let (validator, reasoner) =
        validator_with(ScriptedReasoner::verdict(ReasoningProvider::Gemini, true, "ok"));

    let err = validator
        .validate(ReasoningProvider::OpenAi, "gpt-4o-mini", "What is X?")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ReasoningError::Provider(ProviderError::ProviderNotConfigured { .. })
    ));
    assert_eq!(reasoner.call_count(), 0);
}

#[tokio::test]
async fn test_stub_reasoner_accepts() {
    let validator = QualityValidator::new(Arc::new(ProviderRegistry::stub()));
    let verdict = validator
        .validate(ReasoningProvider::DeepSeek, "any", "What is X?")
        .await
        .unwrap();
    assert!(verdict.is_valid);
}

#[test]
fn test_provider_keys_lookup_and_redaction() {
    let keys = ProviderKeys {
        gemini: Some("g-secret".to_string()),
        openai: None,
        deepseek: Some("d-secret".to_string()),
    };
    assert_eq!(keys.get(ReasoningProvider::Gemini).map(String::as_str), Some("g-secret"));
    assert!(keys.get(ReasoningProvider::OpenAi).is_none());

    let debug = format!("{:?}", keys);
    assert!(!debug.contains("secret"));
    assert!(debug.contains("<set>"));
}

#[test]
fn test_genai_reasoner_reports_its_provider() {
    let client = GenaiReasoner::build_client(ProviderKeys::default());
    let reasoner = GenaiReasoner::new(client, ReasoningProvider::OpenAi, Duration::from_secs(1));
    assert_eq!(reasoner.provider(), ReasoningProvider::OpenAi);
}
