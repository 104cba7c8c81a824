use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Config;
use crate::embedding::{EmbeddingBackend, GeminiEmbedder, OpenAiEmbedder, StubEmbedder};
use crate::validation::{GenaiReasoner, ProviderKeys, ReasoningBackend, StubReasoner};

use super::error::ProviderError;
use super::kind::{Capability, EmbeddingProvider, ReasoningProvider};

/// Process-wide provider handles, built once at startup and shared read-only.
///
/// Backends hold no per-call mutable state, so the registry is handed to every
/// request behind an `Arc` without locking.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    embedders: HashMap<EmbeddingProvider, Arc<dyn EmbeddingBackend>>,
    reasoners: HashMap<ReasoningProvider, Arc<dyn ReasoningBackend>>,
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("embedders", &self.embedding_providers())
            .field("reasoners", &self.reasoning_providers())
            .finish()
    }
}

impl ProviderRegistry {
    /// A registry with nothing registered.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the backend for its own provider.
    pub fn with_embedder(mut self, backend: Arc<dyn EmbeddingBackend>) -> Self {
        self.embedders.insert(backend.provider(), backend);
        self
    }

    /// Registers (or replaces) the backend for its own provider.
    pub fn with_reasoner(mut self, backend: Arc<dyn ReasoningBackend>) -> Self {
        self.reasoners.insert(backend.provider(), backend);
        self
    }

    /// Deterministic, network-free backends for every supported provider.
    pub fn stub() -> Self {
        let mut registry = Self::empty();
        for provider in EmbeddingProvider::ALL {
            registry = registry.with_embedder(Arc::new(StubEmbedder::new(provider)));
        }
        for provider in ReasoningProvider::ALL {
            registry = registry.with_reasoner(Arc::new(StubReasoner::new(provider)));
        }
        registry
    }

    /// Builds real backends for every provider that has credentials.
    ///
    /// Providers without an API key are left out and reported as
    /// [`ProviderError::ProviderNotConfigured`] when a request selects them.
    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        if config.mock_providers {
            warn!("Provider registry running in STUB mode (testing only)");
            return Ok(Self::stub());
        }

        let http = reqwest::Client::builder()
            .timeout(config.provider_timeout)
            .build()
            .map_err(|e| ProviderError::ClientInit {
                reason: e.to_string(),
            })?;

        let mut registry = Self::empty();

        match &config.google_api_key {
            Some(key) => {
                registry = registry.with_embedder(Arc::new(GeminiEmbedder::new(
                    http.clone(),
                    key.clone(),
                    config.gemini_base_url.clone(),
                )));
            }
            None => warn!(provider = "gemini", "GOOGLE_API_KEY not set; Gemini disabled"),
        }

        match &config.openai_api_key {
            Some(key) => {
                registry = registry.with_embedder(Arc::new(OpenAiEmbedder::new(
                    http.clone(),
                    key.clone(),
                    config.openai_base_url.clone(),
                )));
            }
            None => warn!(provider = "openai", "OPENAI_API_KEY not set; OpenAI disabled"),
        }

        let keys = ProviderKeys {
            gemini: config.google_api_key.clone(),
            openai: config.openai_api_key.clone(),
            deepseek: config.deepseek_api_key.clone(),
        };
        let chat_client = GenaiReasoner::build_client(keys.clone());

        for provider in ReasoningProvider::ALL {
            if keys.get(provider).is_some() {
                registry = registry.with_reasoner(Arc::new(GenaiReasoner::new(
                    chat_client.clone(),
                    provider,
                    config.provider_timeout,
                )));
            } else if provider == ReasoningProvider::DeepSeek {
                warn!(provider = %provider, "DEEPSEEK_API_KEY not set; DeepSeek disabled");
            }
        }

        info!(
            embedders = ?registry.embedding_providers(),
            reasoners = ?registry.reasoning_providers(),
            "Provider registry initialized"
        );

        Ok(registry)
    }

    pub fn embedder(
        &self,
        provider: EmbeddingProvider,
    ) -> Result<Arc<dyn EmbeddingBackend>, ProviderError> {
        self.embedders
            .get(&provider)
            .cloned()
            .ok_or(ProviderError::ProviderNotConfigured {
                capability: Capability::Embedding,
                provider: provider.as_str(),
            })
    }

    pub fn reasoner(
        &self,
        provider: ReasoningProvider,
    ) -> Result<Arc<dyn ReasoningBackend>, ProviderError> {
        self.reasoners
            .get(&provider)
            .cloned()
            .ok_or(ProviderError::ProviderNotConfigured {
                capability: Capability::Reasoning,
                provider: provider.as_str(),
            })
    }

    /// Registered embedding providers, in declaration order.
    pub fn embedding_providers(&self) -> Vec<EmbeddingProvider> {
        EmbeddingProvider::ALL
            .into_iter()
            .filter(|p| self.embedders.contains_key(p))
            .collect()
    }

    /// Registered reasoning providers, in declaration order.
    pub fn reasoning_providers(&self) -> Vec<ReasoningProvider> {
        ReasoningProvider::ALL
            .into_iter()
            .filter(|p| self.reasoners.contains_key(p))
            .collect()
    }
}
