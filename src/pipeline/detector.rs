use std::sync::Arc;

use tracing::{debug, info};

use crate::clustering::AgglomerativeClustering;
use crate::config::Config;
use crate::constants::{
    DEFAULT_EMBEDDING_PROVIDER, DEFAULT_REASONING_PROVIDER, MIN_GROUP_CORPUS,
};
use crate::corpus::{CorpusFetcher, Question};
use crate::embedding::EmbeddingClient;
use crate::provider::{ModelResolver, ProviderRegistry};
use crate::scoring::SimilarityEngine;
use crate::text::normalize_markup;
use crate::validation::QualityValidator;

use super::error::PipelineError;
use super::types::{CheckOutcome, CheckRequest, GroupOutcome, GroupRequest};

/// Runs duplicate checks and corpus grouping.
///
/// Every stage runs in sequence and the first failure ends the call. Nothing
/// is cached between calls.
pub struct DuplicateDetector {
    resolver: ModelResolver,
    registry: Arc<ProviderRegistry>,
    embeddings: EmbeddingClient,
    validator: QualityValidator,
    fetcher: Arc<dyn CorpusFetcher>,
    threshold: f64,
    default_embedding_provider: String,
    default_reasoning_provider: String,
}

impl std::fmt::Debug for DuplicateDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuplicateDetector")
            .field("resolver", &self.resolver)
            .field("embeddings", &self.embeddings)
            .field("threshold", &self.threshold)
            .field("default_embedding_provider", &self.default_embedding_provider)
            .field("default_reasoning_provider", &self.default_reasoning_provider)
            .finish_non_exhaustive()
    }
}

impl DuplicateDetector {
    pub fn new(
        resolver: ModelResolver,
        registry: Arc<ProviderRegistry>,
        fetcher: Arc<dyn CorpusFetcher>,
        threshold: f64,
    ) -> Self {
        Self {
            resolver,
            embeddings: EmbeddingClient::new(registry.clone()),
            validator: QualityValidator::new(registry.clone()),
            registry,
            fetcher,
            threshold,
            default_embedding_provider: DEFAULT_EMBEDDING_PROVIDER.to_string(),
            default_reasoning_provider: DEFAULT_REASONING_PROVIDER.to_string(),
        }
    }

    pub fn from_config(
        config: &Config,
        registry: Arc<ProviderRegistry>,
        fetcher: Arc<dyn CorpusFetcher>,
    ) -> Self {
        Self::new(
            ModelResolver::from_config(config),
            registry,
            fetcher,
            config.similarity_threshold,
        )
        .with_default_providers(
            config.default_embedding_provider.clone(),
            config.default_reasoning_provider.clone(),
        )
    }

    pub fn with_default_providers(
        mut self,
        embedding: impl Into<String>,
        reasoning: impl Into<String>,
    ) -> Self {
        self.default_embedding_provider = embedding.into();
        self.default_reasoning_provider = reasoning.into();
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Finds corpus records that duplicate `request.question`.
    ///
    /// Both models are resolved and both backends looked up before any
    /// provider is called. The question is validated before the corpus is
    /// fetched.
    pub async fn check(&self, request: &CheckRequest) -> Result<CheckOutcome, PipelineError> {
        let embedding = self.resolver.resolve_embedding(
            request
                .embedding_provider
                .as_deref()
                .unwrap_or(&self.default_embedding_provider),
        )?;
        let reasoning = self.resolver.resolve_reasoning(
            request
                .reasoning_provider
                .as_deref()
                .unwrap_or(&self.default_reasoning_provider),
        )?;
        self.registry.embedder(embedding.provider)?;
        self.registry.reasoner(reasoning.provider)?;

        let verdict = self
            .validator
            .validate(reasoning.provider, &reasoning.model, &request.question)
            .await?;
        if !verdict.is_valid {
            info!(reason = ?verdict.reason, "Question rejected by validator");
            return Ok(CheckOutcome::InvalidQuestion {
                reason: verdict.reason,
            });
        }

        let corpus = self.fetch(&request.questions_url).await?;
        if corpus.is_empty() {
            return Ok(CheckOutcome::NoExistingQuestions);
        }

        let query = normalize_markup(&request.question);
        let texts = normalized_texts(&corpus);
        let vectors = self
            .embeddings
            .embed_with_query(embedding.provider, &embedding.model, &query, &texts)
            .await?;

        let matches =
            SimilarityEngine::new(self.threshold).find_matches(&vectors.query, &vectors.corpus)?;

        info!(
            corpus = corpus.len(),
            matched = matches.len(),
            provider = %embedding.provider,
            "Similarity check complete"
        );

        if matches.is_empty() {
            return Ok(CheckOutcome::NoMatch);
        }

        let mut corpus: Vec<Option<Question>> = corpus.into_iter().map(Some).collect();
        Ok(CheckOutcome::Matched(
            matches
                .iter()
                .filter_map(|m| corpus.get_mut(m.index).and_then(Option::take))
                .collect(),
        ))
    }

    /// Partitions the corpus at `request.questions_url` into duplicate groups.
    pub async fn group(&self, request: &GroupRequest) -> Result<GroupOutcome, PipelineError> {
        let embedding = self.resolver.resolve_embedding(
            request
                .embedding_provider
                .as_deref()
                .unwrap_or(&self.default_embedding_provider),
        )?;
        self.registry.embedder(embedding.provider)?;
        let clustering = AgglomerativeClustering::from_similarity_threshold(self.threshold)?;

        let corpus = self.fetch(&request.questions_url).await?;
        if corpus.len() < MIN_GROUP_CORPUS {
            return Ok(GroupOutcome::NotEnoughItems);
        }

        let texts = normalized_texts(&corpus);
        let vectors = self
            .embeddings
            .embed(embedding.provider, &embedding.model, &texts)
            .await?;

        let groups = clustering.fit(&vectors)?.group_items(&corpus);

        info!(
            corpus = corpus.len(),
            groups = groups.len(),
            provider = %embedding.provider,
            "Grouping complete"
        );

        if groups.is_empty() {
            Ok(GroupOutcome::NoGroups)
        } else {
            Ok(GroupOutcome::Groups(groups))
        }
    }

    async fn fetch(&self, url: &str) -> Result<Vec<Question>, PipelineError> {
        let corpus = self
            .fetcher
            .fetch(url)
            .await
            .ok_or_else(|| PipelineError::ResourceNotFound {
                url: url.to_string(),
            })?;
        debug!(url = %url, count = corpus.len(), "Corpus fetched");
        Ok(corpus)
    }
}

fn normalized_texts(corpus: &[Question]) -> Vec<String> {
    corpus.iter().map(|q| normalize_markup(q.text())).collect()
}
