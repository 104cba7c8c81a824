//! OpenAI embeddings (`POST {base}/embeddings`).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::provider::EmbeddingProvider;

use super::backend::{Embedding, EmbeddingBackend};
use super::error::EmbeddingError;
use super::http::send_json;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Inputs accepted by one embeddings request.
pub const OPENAI_MAX_BATCH: usize = 2048;

#[derive(Serialize)]
struct OpenAiEmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
    encoding_format: &'static str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenAiEmbeddingResponse {
    pub(crate) data: Vec<OpenAiEmbeddingItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenAiEmbeddingItem {
    pub(crate) index: usize,
    pub(crate) embedding: Embedding,
}

/// Places each returned item at its declared `index`.
///
/// The API documents `data` as ordered, but the `index` field is the contract.
pub(crate) fn order_by_index(
    response: OpenAiEmbeddingResponse,
    expected: usize,
) -> Result<Vec<Embedding>, String> {
    if response.data.len() != expected {
        return Err(format!(
            "expected {} embeddings, got {}",
            expected,
            response.data.len()
        ));
    }

    let mut slots: Vec<Option<Embedding>> = vec![None; expected];
    for item in response.data {
        let slot = slots
            .get_mut(item.index)
            .ok_or_else(|| format!("embedding index {} out of range", item.index))?;
        if slot.is_some() {
            return Err(format!("duplicate embedding index {}", item.index));
        }
        *slot = Some(item.embedding);
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(i, v)| v.ok_or_else(|| format!("missing embedding for index {}", i)))
        .collect()
}

pub struct OpenAiEmbedder {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for OpenAiEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiEmbedder")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl OpenAiEmbedder {
    pub fn new(http: reqwest::Client, api_key: String, base_url: Option<String>) -> Self {
        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        Self {
            http,
            api_key,
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn embed_chunk(&self, model: &str, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        let request = self
            .http
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&OpenAiEmbeddingRequest {
                model,
                input: texts,
                encoding_format: "float",
            });

        let response: OpenAiEmbeddingResponse =
            send_json(request, EmbeddingProvider::OpenAi).await?;

        order_by_index(response, texts.len()).map_err(|reason| EmbeddingError::InvalidResponse {
            provider: EmbeddingProvider::OpenAi,
            reason,
        })
    }
}

#[async_trait]
impl EmbeddingBackend for OpenAiEmbedder {
    fn provider(&self) -> EmbeddingProvider {
        EmbeddingProvider::OpenAi
    }

    async fn embed(&self, model: &str, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(OPENAI_MAX_BATCH) {
            debug!(model = %model, batch = chunk.len(), "Requesting OpenAI embeddings");
            vectors.extend(self.embed_chunk(model, chunk).await?);
        }
        Ok(vectors)
    }
}
