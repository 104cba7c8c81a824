use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::provider::EmbeddingProvider;

use super::backend::{Embedding, EmbeddingBackend};
use super::error::EmbeddingError;
use super::stub::StubEmbedder;

/// Scriptable embedder: pinned vectors for chosen texts, stub vectors for the
/// rest, optional transport failure, and a record of every call.
pub struct MockEmbedder {
    provider: EmbeddingProvider,
    fixed: HashMap<String, Embedding>,
    fallback: StubEmbedder,
    failure: Option<String>,
    calls: AtomicUsize,
    batches: Mutex<Vec<Vec<String>>>,
}

impl MockEmbedder {
    pub fn new(provider: EmbeddingProvider) -> Self {
        Self {
            provider,
            fixed: HashMap::new(),
            fallback: StubEmbedder::new(provider),
            failure: None,
            calls: AtomicUsize::new(0),
            batches: Mutex::new(Vec::new()),
        }
    }

    /// Pins the vector returned for `text`.
    pub fn with_vector(mut self, text: impl Into<String>, vector: Embedding) -> Self {
        self.fixed.insert(text.into(), vector);
        self
    }

    /// Changes the dimension of non-pinned vectors.
    pub fn with_fallback_dim(mut self, dim: usize) -> Self {
        self.fallback = self.fallback.with_dim(dim);
        self
    }

    /// Every call fails as if the provider were unreachable.
    pub fn failing(mut self, reason: impl Into<String>) -> Self {
        self.failure = Some(reason.into());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The batches received so far, in call order.
    pub fn batches(&self) -> Vec<Vec<String>> {
        self.batches.lock().clone()
    }
}

#[async_trait]
impl EmbeddingBackend for MockEmbedder {
    fn provider(&self) -> EmbeddingProvider {
        self.provider
    }

    async fn embed(&self, _model: &str, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.batches.lock().push(texts.to_vec());

        if let Some(reason) = &self.failure {
            return Err(EmbeddingError::Unavailable {
                provider: self.provider,
                reason: reason.clone(),
            });
        }

        Ok(texts
            .iter()
            .map(|t| {
                self.fixed
                    .get(t)
                    .cloned()
                    .unwrap_or_else(|| self.fallback.vector_for(t))
            })
            .collect())
    }
}
