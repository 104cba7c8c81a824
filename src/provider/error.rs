use thiserror::Error;

use super::kind::Capability;

/// Provider selection failures. All of these are configuration faults:
/// the request never reaches a provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("unsupported {capability} provider: '{name}'")]
    UnsupportedProvider { capability: Capability, name: String },

    #[error("model name not found for configuration key {key}")]
    ModelNotConfigured { key: String },

    #[error("{capability} provider '{provider}' is not initialized (missing credentials?)")]
    ProviderNotConfigured {
        capability: Capability,
        provider: &'static str,
    },

    #[error("failed to initialize provider client: {reason}")]
    ClientInit { reason: String },
}
