use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::provider::ReasoningProvider;

use super::backend::ReasoningBackend;
use super::error::ReasoningError;

/// Reasoner that returns a fixed answer (or fails) and records user prompts.
pub struct ScriptedReasoner {
    provider: ReasoningProvider,
    reply: Result<String, String>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedReasoner {
    /// Answers every call with `reply` verbatim.
    pub fn replying(provider: ReasoningProvider, reply: impl Into<String>) -> Self {
        Self {
            provider,
            reply: Ok(reply.into()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Answers with `{"is_valid": <is_valid>, "reason": <reason>}`.
    pub fn verdict(provider: ReasoningProvider, is_valid: bool, reason: &str) -> Self {
        let body = serde_json::json!({ "is_valid": is_valid, "reason": reason });
        Self::replying(provider, body.to_string())
    }

    /// Fails every call as an unreachable provider.
    pub fn failing(provider: ReasoningProvider, reason: impl Into<String>) -> Self {
        Self {
            provider,
            reply: Err(reason.into()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl ReasoningBackend for ScriptedReasoner {
    fn provider(&self) -> ReasoningProvider {
        self.provider
    }

    async fn complete_json(
        &self,
        _model: &str,
        _system: &str,
        user: &str,
    ) -> Result<String, ReasoningError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().push(user.to_string());

        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(reason) => Err(ReasoningError::Unavailable {
                provider: self.provider,
                reason: reason.clone(),
            }),
        }
    }
}
