use async_trait::async_trait;

use crate::provider::ReasoningProvider;

use super::error::ReasoningError;

/// A chat model able to answer with a JSON document.
///
/// Implementations return the raw text of the answer. Interpreting it is the
/// caller's job, so a model that ignores the JSON instruction is not an
/// error at this layer.
#[async_trait]
pub trait ReasoningBackend: Send + Sync {
    fn provider(&self) -> ReasoningProvider;

    async fn complete_json(
        &self,
        model: &str,
        system: &str,
        user: &str,
    ) -> Result<String, ReasoningError>;
}
