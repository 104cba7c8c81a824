use thiserror::Error;

use crate::clustering::ClusteringError;
use crate::embedding::EmbeddingError;
use crate::provider::ProviderError;
use crate::scoring::SimilarityError;
use crate::validation::ReasoningError;

/// Failure classes visible to callers of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Unknown provider, missing model mapping, or missing credentials.
    Configuration,
    /// The corpus location could not be fetched or parsed.
    ResourceNotFound,
    /// An embedding or reasoning provider failed on its side of the wire.
    AiServiceUnavailable,
    /// A broken internal invariant.
    Internal,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Configuration => "configuration_error",
            ErrorCategory::ResourceNotFound => "resource_not_found",
            ErrorCategory::AiServiceUnavailable => "ai_service_unavailable",
            ErrorCategory::Internal => "internal_error",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("resource not found at {url} or could not be parsed")]
    ResourceNotFound { url: String },

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Reasoning(#[from] ReasoningError),

    #[error(transparent)]
    Similarity(#[from] SimilarityError),

    #[error(transparent)]
    Clustering(#[from] ClusteringError),
}

impl PipelineError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PipelineError::Provider(_)
            | PipelineError::Embedding(EmbeddingError::Provider(_))
            | PipelineError::Reasoning(ReasoningError::Provider(_)) => ErrorCategory::Configuration,
            PipelineError::ResourceNotFound { .. } => ErrorCategory::ResourceNotFound,
            PipelineError::Embedding(_) | PipelineError::Reasoning(_) => {
                ErrorCategory::AiServiceUnavailable
            }
            PipelineError::Similarity(_) | PipelineError::Clustering(_) => ErrorCategory::Internal,
        }
    }
}
