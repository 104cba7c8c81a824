use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::json;

use super::*;
use crate::corpus::{Question, StaticCorpusFetcher};
use crate::embedding::{EmbeddingBackend, MockEmbedder};
use crate::provider::{EmbeddingProvider, ProviderRegistry, ReasoningProvider};
use crate::validation::{ReasoningBackend, ScriptedReasoner};

const URL: &str = "http://corpus.test/questions.json";

fn resolver() -> crate::provider::ModelResolver {
    let models: BTreeMap<String, String> = [
        ("GEMINI_EMBEDDING_MODEL", "text-embedding-004"),
        ("GEMINI_REASONING_MODEL", "gemini-2.0-flash"),
        ("OPENAI_EMBEDDING_MODEL", "text-embedding-3-small"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    crate::provider::ModelResolver::new(models)
}

struct Harness {
    detector: DuplicateDetector,
    embedder: Arc<MockEmbedder>,
    reasoner: Arc<ScriptedReasoner>,
    fetcher: Arc<StaticCorpusFetcher>,
}

fn harness(embedder: MockEmbedder, reasoner: ScriptedReasoner, fetcher: StaticCorpusFetcher) -> Harness {
    let embedder = Arc::new(embedder);
    let reasoner = Arc::new(reasoner);
    let fetcher = Arc::new(fetcher);
    let registry = ProviderRegistry::empty()
        .with_embedder(embedder.clone() as Arc<dyn EmbeddingBackend>)
        .with_reasoner(reasoner.clone() as Arc<dyn ReasoningBackend>);
    let detector = DuplicateDetector::new(resolver(), Arc::new(registry), fetcher.clone(), 0.85);
    Harness {
        detector,
        embedder,
        reasoner,
        fetcher,
    }
}

fn accepting() -> ScriptedReasoner {
    ScriptedReasoner::verdict(ReasoningProvider::Gemini, true, "Clear question.")
}

fn gemini_embedder() -> MockEmbedder {
    MockEmbedder::new(EmbeddingProvider::Gemini)
}

#[tokio::test]
async fn test_check_empty_corpus() {
    let h = harness(gemini_embedder(), accepting(), StaticCorpusFetcher::new().with_corpus(URL, vec![]));

    let outcome = h.detector.check(&CheckRequest::new("What is X?", URL)).await.unwrap();

    assert_eq!(outcome, CheckOutcome::NoExistingQuestions);
    assert_eq!(h.embedder.call_count(), 0);
}

#[tokio::test]
async fn test_check_identical_embedding_matches() {
    let record = Question::from_text("What is X?").with_field("id", json!(17));
    let h = harness(
        gemini_embedder()
            .with_vector("What is X??", vec![0.6, 0.8])
            .with_vector("What is X?", vec![0.6, 0.8]),
        accepting(),
        StaticCorpusFetcher::new().with_corpus(URL, vec![record.clone()]),
    );

    let outcome = h.detector.check(&CheckRequest::new("What is X??", URL)).await.unwrap();

    assert_eq!(outcome, CheckOutcome::Matched(vec![record]));
    assert_eq!(h.embedder.batches(), vec![vec!["What is X??".to_string(), "What is X?".to_string()]]);
}

#[tokio::test]
async fn test_check_no_match() {
    let h = harness(
        gemini_embedder()
            .with_vector("q", vec![1.0, 0.0])
            .with_vector("a", vec![0.0, 1.0]),
        accepting(),
        StaticCorpusFetcher::new().with_texts(URL, &["a"]),
    );

    let outcome = h.detector.check(&CheckRequest::new("q", URL)).await.unwrap();

    assert_eq!(outcome, CheckOutcome::NoMatch);
}

#[tokio::test]
async fn test_check_matches_keep_corpus_order_and_metadata() {
    let corpus = vec![
        Question::from_text("<b>a</b>").with_field("n", json!(0)),
        Question::from_text("b").with_field("n", json!(1)),
        Question::from_text("c").with_field("n", json!(2)),
    ];
    let h = harness(
        gemini_embedder()
            .with_vector("q", vec![1.0, 0.0])
            .with_vector("a", vec![1.0, 0.05])
            .with_vector("b", vec![0.0, 1.0])
            .with_vector("c", vec![1.0, 0.0]),
        accepting(),
        StaticCorpusFetcher::new().with_corpus(URL, corpus.clone()),
    );

    let outcome = h.detector.check(&CheckRequest::new("<p>q</p>", URL)).await.unwrap();

    assert_eq!(outcome, CheckOutcome::Matched(vec![corpus[0].clone(), corpus[2].clone()]));
    assert_eq!(h.embedder.batches()[0], vec!["q", "a", "b", "c"]);
}

#[tokio::test]
async fn test_check_invalid_question_stops_before_fetch() {
    let h = harness(
        gemini_embedder(),
        ScriptedReasoner::verdict(ReasoningProvider::Gemini, false, "Not a question."),
        StaticCorpusFetcher::new().with_texts(URL, &["a"]),
    );

    let outcome = h.detector.check(&CheckRequest::new("asdf", URL)).await.unwrap();

    assert_eq!(
        outcome,
        CheckOutcome::InvalidQuestion {
            reason: Some("Not a question.".to_string())
        }
    );
    assert_eq!(h.fetcher.call_count(), 0);
    assert_eq!(h.embedder.call_count(), 0);
}

#[tokio::test]
async fn test_check_malformed_validator_answer_rejects_question() {
    let h = harness(
        gemini_embedder(),
        ScriptedReasoner::replying(ReasoningProvider::Gemini, "I think it's fine"),
        StaticCorpusFetcher::new().with_texts(URL, &["a"]),
    );

    let outcome = h.detector.check(&CheckRequest::new("What is X?", URL)).await.unwrap();

    assert!(matches!(outcome, CheckOutcome::InvalidQuestion { .. }));
}

#[tokio::test]
async fn test_check_embedding_outage_is_unavailable() {
    let h = harness(
        gemini_embedder().failing("connection reset"),
        accepting(),
        StaticCorpusFetcher::new().with_texts(URL, &["a", "b"]),
    );

    let err = h.detector.check(&CheckRequest::new("What is X?", URL)).await.unwrap_err();

    assert_eq!(err.category(), ErrorCategory::AiServiceUnavailable);
}

#[tokio::test]
async fn test_check_validator_outage_is_unavailable() {
    let h = harness(
        gemini_embedder(),
        ScriptedReasoner::failing(ReasoningProvider::Gemini, "HTTP 503"),
        StaticCorpusFetcher::new().with_texts(URL, &["a"]),
    );

    let err = h.detector.check(&CheckRequest::new("What is X?", URL)).await.unwrap_err();

    assert_eq!(err.category(), ErrorCategory::AiServiceUnavailable);
    assert_eq!(h.fetcher.call_count(), 0);
}

#[tokio::test]
async fn test_check_fetch_failure_is_not_found() {
    let h = harness(gemini_embedder(), accepting(), StaticCorpusFetcher::new());

    let err = h.detector.check(&CheckRequest::new("What is X?", URL)).await.unwrap_err();

    assert_eq!(err.category(), ErrorCategory::ResourceNotFound);
    assert_eq!(h.embedder.call_count(), 0);
}

#[tokio::test]
async fn test_check_unknown_provider_is_configuration_error() {
    let h = harness(gemini_embedder(), accepting(), StaticCorpusFetcher::new().with_texts(URL, &["a"]));

    let request = CheckRequest::new("What is X?", URL).with_embedding_provider("cohere");
    let err = h.detector.check(&request).await.unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Configuration);
    assert_eq!(h.reasoner.call_count(), 0);
}

#[tokio::test]
async fn test_check_missing_model_is_configuration_error() {
    let h = harness(gemini_embedder(), accepting(), StaticCorpusFetcher::new().with_texts(URL, &["a"]));

    // No OPENAI_REASONING_MODEL configured.
    let request = CheckRequest::new("What is X?", URL).with_reasoning_provider("openai");
    let err = h.detector.check(&request).await.unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Configuration);
    assert_eq!(h.reasoner.call_count(), 0);
}

#[tokio::test]
async fn test_check_unregistered_backend_is_configuration_error() {
    let h = harness(gemini_embedder(), accepting(), StaticCorpusFetcher::new().with_texts(URL, &["a"]));

    // The model is configured but no OpenAI backend is registered.
    let request = CheckRequest::new("What is X?", URL).with_embedding_provider("openai");
    let err = h.detector.check(&request).await.unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Configuration);
    assert_eq!(h.reasoner.call_count(), 0);
    assert_eq!(h.fetcher.call_count(), 0);
    assert_eq!(h.embedder.call_count(), 0);
}

#[tokio::test]
async fn test_group_unregistered_backend_fails_before_fetch() {
    let h = harness(gemini_embedder(), accepting(), StaticCorpusFetcher::new().with_texts(URL, &["a", "b"]));

    let request = GroupRequest::new(URL).with_embedding_provider("openai");
    let err = h.detector.group(&request).await.unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Configuration);
    assert_eq!(h.fetcher.call_count(), 0);
    assert_eq!(h.embedder.call_count(), 0);
}

fn scenario_c_embedder() -> MockEmbedder {
    gemini_embedder()
        .with_vector("q0", vec![1.0, 0.0, 0.0, 0.0])
        .with_vector("q1", vec![0.0, 1.0, 0.0, 0.0])
        .with_vector("q2", vec![1.0, 0.0, 0.0, 0.0])
        .with_vector("q3", vec![0.0, 0.0, 1.0, 0.0])
        .with_vector("q4", vec![0.0, 0.0, 0.0, 1.0])
}

#[tokio::test]
async fn test_group_returns_only_duplicate_clusters() {
    let corpus: Vec<Question> = (0..5)
        .map(|i| Question::from_text(format!("q{}", i)).with_field("id", json!(i)))
        .collect();
    let h = harness(
        scenario_c_embedder(),
        accepting(),
        StaticCorpusFetcher::new().with_corpus(URL, corpus.clone()),
    );

    let outcome = h.detector.group(&GroupRequest::new(URL)).await.unwrap();

    assert_eq!(outcome, GroupOutcome::Groups(vec![vec![corpus[0].clone(), corpus[2].clone()]]));
    assert_eq!(h.reasoner.call_count(), 0);
}

#[tokio::test]
async fn test_group_single_item_skips_embedding() {
    let h = harness(gemini_embedder(), accepting(), StaticCorpusFetcher::new().with_texts(URL, &["only"]));

    let outcome = h.detector.group(&GroupRequest::new(URL)).await.unwrap();

    assert_eq!(outcome, GroupOutcome::NotEnoughItems);
    assert_eq!(h.embedder.call_count(), 0);
}

#[tokio::test]
async fn test_group_no_groups() {
    let h = harness(
        scenario_c_embedder(),
        accepting(),
        StaticCorpusFetcher::new().with_texts(URL, &["q0", "q1", "q3"]),
    );

    let outcome = h.detector.group(&GroupRequest::new(URL)).await.unwrap();

    assert_eq!(outcome, GroupOutcome::NoGroups);
}

#[tokio::test]
async fn test_group_errors_are_categorized() {
    let outage = harness(
        gemini_embedder().failing("timeout"),
        accepting(),
        StaticCorpusFetcher::new().with_texts(URL, &["a", "b"]),
    );
    let err = outage.detector.group(&GroupRequest::new(URL)).await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::AiServiceUnavailable);

    let missing = harness(gemini_embedder(), accepting(), StaticCorpusFetcher::new());
    let err = missing.detector.group(&GroupRequest::new(URL)).await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::ResourceNotFound);
}

#[test]
fn test_vector_faults_are_internal() {
    let similarity = PipelineError::from(crate::scoring::SimilarityError::EmptyQuery);
    assert_eq!(similarity.category(), ErrorCategory::Internal);

    let clustering = PipelineError::from(crate::clustering::ClusteringError::InvalidThreshold {
        value: -1.0,
    });
    assert_eq!(clustering.category(), ErrorCategory::Internal);
}

#[test]
fn test_category_names() {
    assert_eq!(ErrorCategory::Configuration.as_str(), "configuration_error");
    assert_eq!(ErrorCategory::ResourceNotFound.to_string(), "resource_not_found");
    assert_eq!(ErrorCategory::AiServiceUnavailable.as_str(), "ai_service_unavailable");
    assert_eq!(ErrorCategory::Internal.as_str(), "internal_error");
}

#[test]
fn test_default_providers_come_from_config() {
    let mut config =
        crate::Config::default().with_model("OPENAI_EMBEDDING_MODEL", "text-embedding-3-small");
    config.default_embedding_provider = "openai".to_string();

    let detector = DuplicateDetector::from_config(
        &config,
        Arc::new(ProviderRegistry::stub()),
        Arc::new(StaticCorpusFetcher::new()),
    );

    assert!((detector.threshold() - 0.85).abs() < f64::EPSILON);
    assert!(format!("{:?}", detector).contains("openai"));
}
