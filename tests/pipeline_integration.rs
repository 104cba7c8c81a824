//! End-to-end pipeline tests over the stub provider registry.

use std::collections::BTreeMap;
use std::sync::Arc;

use doppel::{
    CheckOutcome, CheckRequest, DuplicateDetector, ErrorCategory, GroupOutcome, GroupRequest,
    ModelResolver, ProviderRegistry, Question, StaticCorpusFetcher,
};
use serde_json::json;

const URL: &str = "https://questions.example/bank.json";

fn resolver() -> ModelResolver {
    let models: BTreeMap<String, String> = [
        ("GEMINI_EMBEDDING_MODEL", "text-embedding-004"),
        ("OPENAI_EMBEDDING_MODEL", "text-embedding-3-small"),
        ("GEMINI_REASONING_MODEL", "gemini-2.0-flash"),
        ("OPENAI_REASONING_MODEL", "gpt-4o-mini"),
        ("DEEPSEEK_REASONING_MODEL", "deepseek-chat"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    ModelResolver::new(models)
}

fn detector(corpus: Vec<Question>) -> DuplicateDetector {
    let fetcher = StaticCorpusFetcher::new().with_corpus(URL, corpus);
    DuplicateDetector::new(
        resolver(),
        Arc::new(ProviderRegistry::stub()),
        Arc::new(fetcher),
        0.85,
    )
}

fn record(id: u64, text: &str) -> Question {
    Question::from_text(text).with_field("id", json!(id))
}

#[tokio::test]
async fn test_check_finds_markup_wrapped_duplicate() {
    let corpus = vec![
        record(1, "How do I reverse a linked list?"),
        record(2, "<p>What is the capital of France?</p>"),
        record(3, "Explain borrow checking."),
    ];
    let detector = detector(corpus.clone());

    let outcome = detector
        .check(&CheckRequest::new("  What is the capital of France?  ", URL))
        .await
        .unwrap();

    assert_eq!(outcome, CheckOutcome::Matched(vec![corpus[1].clone()]));
}

#[tokio::test]
async fn test_check_every_provider_combination() {
    let corpus = vec![record(1, "What is X?")];
    let detector = detector(corpus);

    for embedding in ["gemini", "openai"] {
        for reasoning in ["gemini", "openai", "deepseek"] {
            let request = CheckRequest::new("What is X?", URL)
                .with_embedding_provider(embedding)
                .with_reasoning_provider(reasoning);
            let outcome = detector.check(&request).await.unwrap();
            assert!(
                matches!(outcome, CheckOutcome::Matched(ref m) if m.len() == 1),
                "{}/{} gave {:?}",
                embedding,
                reasoning,
                outcome
            );
        }
    }
}

#[tokio::test]
async fn test_check_rejects_reasoning_only_provider_for_embedding() {
    let detector = detector(vec![record(1, "What is X?")]);

    let request = CheckRequest::new("What is X?", URL).with_embedding_provider("deepseek");
    let err = detector.check(&request).await.unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Configuration);
}

#[tokio::test]
async fn test_group_collects_duplicates_in_input_order() {
    let corpus = vec![
        record(1, "What is X?"),
        record(2, "Why is the sky blue?"),
        record(3, "<div>What is X?</div>"),
        record(4, "How many legs does a spider have?"),
        record(5, "Why is the sky blue?"),
        record(6, "What is X?"),
    ];
    let detector = detector(corpus.clone());

    let outcome = detector
        .group(&GroupRequest::new(URL).with_embedding_provider("openai"))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        GroupOutcome::Groups(vec![
            vec![corpus[0].clone(), corpus[2].clone(), corpus[5].clone()],
            vec![corpus[1].clone(), corpus[4].clone()],
        ])
    );
}

#[tokio::test]
async fn test_group_distinct_questions_form_no_groups() {
    let detector = detector(vec![
        record(1, "What is X?"),
        record(2, "Why is the sky blue?"),
        record(3, "How many legs does a spider have?"),
    ]);

    let outcome = detector.group(&GroupRequest::new(URL)).await.unwrap();

    assert_eq!(outcome, GroupOutcome::NoGroups);
}

#[tokio::test]
async fn test_unknown_url_is_resource_not_found() {
    let detector = detector(vec![]);

    let err = detector
        .group(&GroupRequest::new("https://questions.example/missing.json"))
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::ResourceNotFound);
}
