use std::collections::BTreeMap;

use tracing::debug;

use crate::config::Config;
use crate::constants::MODEL_KEY_SUFFIX;

use super::error::ProviderError;
use super::kind::{Capability, EmbeddingProvider, ReasoningProvider};

/// A provider paired with the model identifier configured for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedModel<P> {
    pub provider: P,
    pub model: String,
}

/// Builds the configuration key for a `(capability, provider)` pair:
/// `uppercase(provider) + "_" + uppercase(capability) + "_MODEL"`.
pub fn model_key(capability: Capability, provider: &str) -> String {
    format!(
        "{}_{}{}",
        provider.trim().to_uppercase(),
        capability.key_part(),
        MODEL_KEY_SUFFIX
    )
}

/// Maps `(capability, provider)` to a configured model identifier.
///
/// There is no fallback model: a missing entry is always an error.
#[derive(Debug, Clone, Default)]
pub struct ModelResolver {
    models: BTreeMap<String, String>,
}

impl ModelResolver {
    pub fn new(models: BTreeMap<String, String>) -> Self {
        Self { models }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.models.clone())
    }

    /// Resolves a raw provider name for a capability.
    ///
    /// The name must belong to the capability's supported set; the lookup key
    /// is then built with [`model_key`].
    pub fn resolve(&self, capability: Capability, provider: &str) -> Result<String, ProviderError> {
        match capability {
            Capability::Embedding => self.resolve_embedding(provider).map(|r| r.model),
            Capability::Reasoning => self.resolve_reasoning(provider).map(|r| r.model),
        }
    }

    pub fn resolve_embedding(
        &self,
        provider: &str,
    ) -> Result<ResolvedModel<EmbeddingProvider>, ProviderError> {
        let provider: EmbeddingProvider = provider.parse()?;
        let model = self.lookup(Capability::Embedding, provider.as_str())?;
        Ok(ResolvedModel { provider, model })
    }

    pub fn resolve_reasoning(
        &self,
        provider: &str,
    ) -> Result<ResolvedModel<ReasoningProvider>, ProviderError> {
        let provider: ReasoningProvider = provider.parse()?;
        let model = self.lookup(Capability::Reasoning, provider.as_str())?;
        Ok(ResolvedModel { provider, model })
    }

    fn lookup(&self, capability: Capability, provider: &str) -> Result<String, ProviderError> {
        let key = model_key(capability, provider);
        match self.models.get(&key) {
            Some(model) => {
                debug!(key = %key, model = %model, "Resolved provider model");
                Ok(model.clone())
            }
            None => Err(ProviderError::ModelNotConfigured { key }),
        }
    }
}
