use std::sync::Arc;

use tracing::{debug, error};

use crate::provider::{EmbeddingProvider, ProviderRegistry};

use super::backend::Embedding;
use super::error::EmbeddingError;

/// A query vector recovered from position 0 plus the corpus vectors after it.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryEmbeddings {
    pub query: Embedding,
    pub corpus: Vec<Embedding>,
}

/// Single entry point for every embedding backend.
///
/// Guarantees one vector per input, in input order, all of the same length.
#[derive(Debug, Clone)]
pub struct EmbeddingClient {
    registry: Arc<ProviderRegistry>,
}

impl EmbeddingClient {
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self { registry }
    }

    /// Embeds `texts` through `provider` using `model`.
    pub async fn embed(
        &self,
        provider: EmbeddingProvider,
        model: &str,
        texts: &[String],
    ) -> Result<Vec<Embedding>, EmbeddingError> {
        let backend = self.registry.embedder(provider)?;

        if texts.is_empty() {
            return Ok(vec![]);
        }

        debug!(provider = %provider, model = %model, count = texts.len(), "Embedding batch");

        let vectors = backend.embed(model, texts).await?;
        Self::check_batch(provider, texts.len(), &vectors)?;

        Ok(vectors)
    }

    /// Embeds `query` followed by `corpus` in one batch.
    ///
    /// The query is always submitted at index 0 so its vector can be
    /// separated positionally from the corpus vectors.
    pub async fn embed_with_query(
        &self,
        provider: EmbeddingProvider,
        model: &str,
        query: &str,
        corpus: &[String],
    ) -> Result<QueryEmbeddings, EmbeddingError> {
        let mut batch = Vec::with_capacity(corpus.len() + 1);
        batch.push(query.to_string());
        batch.extend(corpus.iter().cloned());

        let mut vectors = self.embed(provider, model, &batch).await?.into_iter();
        let query = vectors.next().ok_or_else(|| EmbeddingError::InvalidResponse {
            provider,
            reason: "no vector returned for the query".to_string(),
        })?;

        Ok(QueryEmbeddings {
            query,
            corpus: vectors.collect(),
        })
    }

    fn check_batch(
        provider: EmbeddingProvider,
        expected: usize,
        vectors: &[Embedding],
    ) -> Result<(), EmbeddingError> {
        if vectors.len() != expected {
            error!(provider = %provider, expected, got = vectors.len(), "Embedding count mismatch");
            return Err(EmbeddingError::InvalidResponse {
                provider,
                reason: format!("expected {} embeddings, got {}", expected, vectors.len()),
            });
        }

        let dim = vectors.first().map(Vec::len).unwrap_or(0);
        if dim == 0 {
            return Err(EmbeddingError::InvalidResponse {
                provider,
                reason: "empty embedding vector".to_string(),
            });
        }

        if let Some((index, v)) = vectors.iter().enumerate().find(|(_, v)| v.len() != dim) {
            return Err(EmbeddingError::InvalidResponse {
                provider,
                reason: format!(
                    "embedding {} has dimension {}, expected {}",
                    index,
                    v.len(),
                    dim
                ),
            });
        }

        Ok(())
    }
}
