//! Gemini embeddings (`batchEmbedContents`).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::provider::EmbeddingProvider;

use super::backend::{Embedding, EmbeddingBackend};
use super::error::EmbeddingError;
use super::http::send_json;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Requests accepted by one `batchEmbedContents` call.
pub const GEMINI_MAX_BATCH: usize = 100;

const GEMINI_TASK_TYPE: &str = "RETRIEVAL_DOCUMENT";

#[derive(Serialize)]
struct BatchEmbedRequest<'a> {
    requests: Vec<EmbedContentRequest<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedContentRequest<'a> {
    model: String,
    content: Content<'a>,
    task_type: &'static str,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BatchEmbedResponse {
    #[serde(default)]
    pub(crate) embeddings: Vec<ContentEmbedding>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContentEmbedding {
    pub(crate) values: Embedding,
}

/// `models/text-embedding-004` and `text-embedding-004` name the same model.
pub(crate) fn api_model_name(model: &str) -> &str {
    model.strip_prefix("models/").unwrap_or(model)
}

pub struct GeminiEmbedder {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for GeminiEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiEmbedder")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GeminiEmbedder {
    pub fn new(http: reqwest::Client, api_key: String, base_url: Option<String>) -> Self {
        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string())
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
        let model = api_model_name(model);
        let qualified = format!("models/{}", model);

        let body = BatchEmbedRequest {
            requests: texts
                .iter()
                .map(|text| EmbedContentRequest {
                    model: qualified.clone(),
                    content: Content {
                        parts: [Part { text }],
                    },
                    task_type: GEMINI_TASK_TYPE,
                })
                .collect(),
        };

        let request = self
            .http
            .post(format!(
                "{}/v1beta/models/{}:batchEmbedContents",
                self.base_url, model
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(&body);

        let response: BatchEmbedResponse = send_json(request, EmbeddingProvider::Gemini).await?;

        if response.embeddings.len() != texts.len() {
            return Err(EmbeddingError::InvalidResponse {
                provider: EmbeddingProvider::Gemini,
                reason: format!(
                    "expected {} embeddings, got {}",
                    texts.len(),
                    response.embeddings.len()
                ),
            });
        }

        Ok(response.embeddings.into_iter().map(|e| e.values).collect())
    }
}

#[async_trait]
impl EmbeddingBackend for GeminiEmbedder {
    fn provider(&self) -> EmbeddingProvider {
        EmbeddingProvider::Gemini
    }

    async fn embed(&self, model: &str, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(GEMINI_MAX_BATCH) {
            debug!(model = %model, batch = chunk.len(), "Requesting Gemini embeddings");
            vectors.extend(self.embed_chunk(model, chunk).await?);
        }
        Ok(vectors)
    }
}
