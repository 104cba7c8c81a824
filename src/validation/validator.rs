use std::sync::Arc;

use tracing::{debug, warn};

use crate::provider::{ProviderRegistry, ReasoningProvider};

use super::error::ReasoningError;
use super::verdict::ValidationVerdict;

pub const VALIDATOR_SYSTEM_PROMPT: &str = "You are an expert evaluator. Analyze the user's question. \
Determine if it is grammatically correct, complete, and makes logical sense. \
Respond ONLY with a valid JSON object with two keys: 'is_valid' (boolean) and \
'reason' (a brief string explanation).";

/// User message sent for `question`.
pub fn validator_user_prompt(question: &str) -> String {
    format!("Question: \"{}\"", question)
}

/// LLM-backed question quality check.
#[derive(Debug, Clone)]
pub struct QualityValidator {
    registry: Arc<ProviderRegistry>,
}

impl QualityValidator {
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self { registry }
    }

    /// Asks `provider`/`model` whether `question` is well formed.
    ///
    /// Provider outages are returned as errors. An answer that cannot be read
    /// is a negative verdict, not an error.
    pub async fn validate(
        &self,
        provider: ReasoningProvider,
        model: &str,
        question: &str,
    ) -> Result<ValidationVerdict, ReasoningError> {
        let backend = self.registry.reasoner(provider)?;

        let answer = backend
            .complete_json(model, VALIDATOR_SYSTEM_PROMPT, &validator_user_prompt(question))
            .await?;

        let verdict = ValidationVerdict::parse(&answer);
        if verdict.malformed {
            warn!(
                provider = %provider,
                model = %model,
                answer = %answer,
                "Validator answer was not a valid verdict; treating question as invalid"
            );
        } else {
            debug!(provider = %provider, is_valid = verdict.is_valid, "Question validated");
        }

        Ok(verdict)
    }
}
