//! Question quality validation through a reasoning model.

mod backend;
mod chat;
mod error;
mod stub;
mod validator;
mod verdict;

#[cfg(any(test, feature = "mock"))]
mod mock;

#[cfg(test)]
mod tests;

pub use backend::ReasoningBackend;
pub use chat::{GenaiReasoner, ProviderKeys};
pub use error::ReasoningError;
pub use stub::StubReasoner;
pub use validator::{QualityValidator, VALIDATOR_SYSTEM_PROMPT, validator_user_prompt};
pub use verdict::ValidationVerdict;

#[cfg(any(test, feature = "mock"))]
pub use mock::ScriptedReasoner;
