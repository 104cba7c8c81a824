//! Doppel library crate (used by the server and integration tests).
//!
//! # Public API Surface
//!
//! ## Core Types
//! - [`Config`], [`ConfigError`] - Environment-backed configuration
//! - [`DuplicateDetector`] - The check and group pipelines
//! - [`PipelineError`], [`ErrorCategory`] - Failure taxonomy surfaced to callers
//!
//! ## Providers
//! - [`ModelResolver`] - `(capability, provider)` to model identifier
//! - [`ProviderRegistry`] - Backends built once at startup and shared read-only
//! - [`EmbeddingClient`], [`QualityValidator`] - Adapters over the registry
//!
//! ## Algorithms
//! - [`SimilarityEngine`], [`cosine_similarity`] - Threshold matching
//! - [`AgglomerativeClustering`] - Average-linkage clustering over cosine distance
//! - [`normalize_markup`] - Markup stripping before embedding
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod clustering;
pub mod config;
pub mod constants;
pub mod corpus;
pub mod embedding;
pub mod pipeline;
pub mod provider;
pub mod scoring;
pub mod text;
pub mod validation;

pub use clustering::{AgglomerativeClustering, ClusterAssignment, ClusteringError};
pub use config::{Config, ConfigError};
pub use corpus::{CorpusFetcher, HttpCorpusFetcher, Question};
pub use embedding::{Embedding, EmbeddingBackend, EmbeddingClient, EmbeddingError, StubEmbedder};
pub use pipeline::{
    CheckOutcome, CheckRequest, DuplicateDetector, ErrorCategory, GroupOutcome, GroupRequest,
    PipelineError,
};
pub use provider::{
    Capability, EmbeddingProvider, ModelResolver, ProviderError, ProviderRegistry,
    ReasoningProvider,
};
pub use scoring::{ScoredMatch, SimilarityEngine, SimilarityError, cosine_similarity};
pub use text::normalize_markup;
pub use validation::{QualityValidator, ReasoningBackend, ReasoningError, ValidationVerdict};

#[cfg(any(test, feature = "mock"))]
pub use corpus::StaticCorpusFetcher;
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbedder;
#[cfg(any(test, feature = "mock"))]
pub use validation::ScriptedReasoner;
