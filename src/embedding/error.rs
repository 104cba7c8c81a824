use thiserror::Error;

use crate::provider::{EmbeddingProvider, ProviderError};

#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// Provider could not be selected; nothing was sent.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Transport failure, timeout or non-2xx status.
    #[error("the {provider} embedding service is unavailable: {reason}")]
    Unavailable {
        provider: EmbeddingProvider,
        reason: String,
    },

    /// The provider answered, but not with one usable vector per input.
    #[error("the {provider} embedding service returned an invalid response: {reason}")]
    InvalidResponse {
        provider: EmbeddingProvider,
        reason: String,
    },
}

impl EmbeddingError {
    /// `true` for failures on the provider side of the wire.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            EmbeddingError::Unavailable { .. } | EmbeddingError::InvalidResponse { .. }
        )
    }
}
