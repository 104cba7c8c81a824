use async_trait::async_trait;

use crate::provider::ReasoningProvider;

use super::backend::ReasoningBackend;
use super::error::ReasoningError;

/// Accepts every question. Used when providers run in stub mode.
#[derive(Debug, Clone)]
pub struct StubReasoner {
    provider: ReasoningProvider,
}

impl StubReasoner {
    pub fn new(provider: ReasoningProvider) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl ReasoningBackend for StubReasoner {
    fn provider(&self) -> ReasoningProvider {
        self.provider
    }

    async fn complete_json(
        &self,
        _model: &str,
        _system: &str,
        _user: &str,
    ) -> Result<String, ReasoningError> {
        Ok(r#"{"is_valid": true, "reason": "stub reasoner accepts every question"}"#.to_string())
    }
}
