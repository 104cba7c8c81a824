use async_trait::async_trait;
use tracing::debug;

use crate::provider::EmbeddingProvider;

use super::backend::{Embedding, EmbeddingBackend};
use super::error::EmbeddingError;

/// Output dimension of [`StubEmbedder`].
pub const STUB_EMBEDDING_DIM: usize = 64;

/// Deterministic embedder for tests and offline runs.
///
/// Each text is hashed with blake3 and expanded into a unit vector, so equal
/// texts always embed identically and different texts are nearly orthogonal.
#[derive(Debug, Clone)]
pub struct StubEmbedder {
    provider: EmbeddingProvider,
    dim: usize,
}

impl StubEmbedder {
    pub fn new(provider: EmbeddingProvider) -> Self {
        Self {
            provider,
            dim: STUB_EMBEDDING_DIM,
        }
    }

    pub fn with_dim(mut self, dim: usize) -> Self {
        self.dim = dim;
        self
    }

    /// The vector this embedder produces for `text`.
    pub fn vector_for(&self, text: &str) -> Embedding {
        let digest = blake3::hash(text.as_bytes());
        let mut seed = [0u8; 8];
        seed.copy_from_slice(&digest.as_bytes()[..8]);
        let mut state = u64::from_le_bytes(seed);

        let mut embedding = Vec::with_capacity(self.dim);
        for _ in 0..self.dim {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            let value = ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0;
            embedding.push(value);
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut embedding {
                *x /= norm;
            }
        }

        embedding
    }
}

#[async_trait]
impl EmbeddingBackend for StubEmbedder {
    fn provider(&self) -> EmbeddingProvider {
        self.provider
    }

    async fn embed(&self, _model: &str, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        debug!(count = texts.len(), "Generating stub embeddings");
        Ok(texts.iter().map(|t| self.vector_for(t)).collect())
    }
}
