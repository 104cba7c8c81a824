use std::time::Duration;

use async_trait::async_trait;
use genai::adapter::AdapterKind;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest, ChatResponseFormat};
use genai::resolver::{AuthData, AuthResolver};
use genai::{Client, ModelIden};
use tracing::{debug, error};

use crate::provider::ReasoningProvider;

use super::backend::ReasoningBackend;
use super::error::ReasoningError;

/// API keys handed to the chat client's auth resolver.
#[derive(Clone, Default)]
pub struct ProviderKeys {
    pub gemini: Option<String>,
    pub openai: Option<String>,
    pub deepseek: Option<String>,
}

impl std::fmt::Debug for ProviderKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = |k: &Option<String>| if k.is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("ProviderKeys")
            .field("gemini", &state(&self.gemini))
            .field("openai", &state(&self.openai))
            .field("deepseek", &state(&self.deepseek))
            .finish()
    }
}

impl ProviderKeys {
    pub fn get(&self, provider: ReasoningProvider) -> Option<&String> {
        match provider {
            ReasoningProvider::Gemini => self.gemini.as_ref(),
            ReasoningProvider::OpenAi => self.openai.as_ref(),
            ReasoningProvider::DeepSeek => self.deepseek.as_ref(),
        }
    }

    fn for_adapter(&self, kind: AdapterKind) -> Option<&String> {
        match kind {
            AdapterKind::Gemini => self.gemini.as_ref(),
            AdapterKind::OpenAI => self.openai.as_ref(),
            AdapterKind::DeepSeek => self.deepseek.as_ref(),
            _ => None,
        }
    }
}

/// Reasoning backend on top of the shared `genai` client.
///
/// `genai` picks the vendor adapter from the model name, so one client
/// serves every provider; `provider` only labels errors and logs.
#[derive(Clone)]
pub struct GenaiReasoner {
    client: Client,
    provider: ReasoningProvider,
    timeout: Duration,
}

impl GenaiReasoner {
    /// One chat client whose credentials come from `keys`.
    pub fn build_client(keys: ProviderKeys) -> Client {
        let resolver = AuthResolver::from_resolver_fn(
            move |model_iden: ModelIden| -> Result<Option<AuthData>, genai::resolver::Error> {
                Ok(keys
                    .for_adapter(model_iden.adapter_kind)
                    .map(|key| AuthData::from_single(key.clone())))
            },
        );

        Client::builder().with_auth_resolver(resolver).build()
    }

    pub fn new(client: Client, provider: ReasoningProvider, timeout: Duration) -> Self {
        Self {
            client,
            provider,
            timeout,
        }
    }

    fn unavailable(&self, reason: String) -> ReasoningError {
        ReasoningError::Unavailable {
            provider: self.provider,
            reason,
        }
    }
}

#[async_trait]
impl ReasoningBackend for GenaiReasoner {
    fn provider(&self) -> ReasoningProvider {
        self.provider
    }

    async fn complete_json(
        &self,
        model: &str,
        system: &str,
        user: &str,
    ) -> Result<String, ReasoningError> {
        let request = ChatRequest::new(vec![ChatMessage::system(system), ChatMessage::user(user)]);
        let options = ChatOptions::default().with_response_format(ChatResponseFormat::JsonMode);

        debug!(provider = %self.provider, model = %model, "Sending reasoning request");

        let response = tokio::time::timeout(
            self.timeout,
            self.client.exec_chat(model, request, Some(&options)),
        )
        .await
        .map_err(|_| {
            error!(provider = %self.provider, timeout = ?self.timeout, "Reasoning request timed out");
            self.unavailable(format!("timed out after {:?}", self.timeout))
        })?
        .map_err(|e| {
            error!(provider = %self.provider, error = %e, "Reasoning request failed");
            self.unavailable(e.to_string())
        })?;

        Ok(response.first_text().unwrap_or_default().to_string())
    }
}
