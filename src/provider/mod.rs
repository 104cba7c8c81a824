//! Provider selection: which backend and which model serve a call.
//!
//! Provider names arriving from requests are parsed into closed enums
//! ([`EmbeddingProvider`], [`ReasoningProvider`]) and paired with a model via
//! [`ModelResolver`]. Backend handles live in a [`ProviderRegistry`] built once
//! at startup.

mod error;
mod kind;
mod registry;
mod resolver;


pub use error::ProviderError;
pub use kind::{Capability, EmbeddingProvider, ReasoningProvider};
pub use registry::ProviderRegistry;
pub use resolver::{ModelResolver, ResolvedModel, model_key};
