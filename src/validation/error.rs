use thiserror::Error;

use crate::provider::{ProviderError, ReasoningProvider};

#[derive(Debug, Error)]
pub enum ReasoningError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Transport failure, provider error status or timeout.
    #[error("the {provider} reasoning service is unavailable: {reason}")]
    Unavailable {
        provider: ReasoningProvider,
        reason: String,
    },
}
