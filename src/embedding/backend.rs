use async_trait::async_trait;

use crate::provider::EmbeddingProvider;

use super::error::EmbeddingError;

/// One embedding vector.
pub type Embedding = Vec<f32>;

/// A single embedding vendor.
///
/// Implementations must return exactly one vector per input, in input order,
/// without dropping or deduplicating repeated texts.
#[async_trait]
pub trait EmbeddingBackend: Send + Sync {
    /// The provider this backend serves.
    fn provider(&self) -> EmbeddingProvider;

    /// Embeds `texts` with `model`.
    async fn embed(&self, model: &str, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError>;
}
