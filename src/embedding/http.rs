use serde::de::DeserializeOwned;
use tracing::error;

use crate::provider::EmbeddingProvider;

use super::error::EmbeddingError;

const MAX_ERROR_BODY_CHARS: usize = 200;

/// Sends a prepared request and decodes a 2xx JSON body.
///
/// Transport errors, timeouts and non-2xx statuses become
/// [`EmbeddingError::Unavailable`]; an undecodable 2xx body becomes
/// [`EmbeddingError::InvalidResponse`].
pub(crate) async fn send_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    provider: EmbeddingProvider,
) -> Result<T, EmbeddingError> {
    let response = request.send().await.map_err(|e| {
        let reason = if e.is_timeout() {
            format!("request timed out: {}", e)
        } else {
            format!("HTTP request failed: {}", e)
        };
        error!(provider = %provider, reason = %reason, "AI service unavailable");
        EmbeddingError::Unavailable { provider, reason }
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let snippet: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
        error!(provider = %provider, status = %status, body = %snippet, "AI service unavailable");
        return Err(EmbeddingError::Unavailable {
            provider,
            reason: format!("HTTP {}: {}", status, snippet),
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| EmbeddingError::InvalidResponse {
            provider,
            reason: format!("failed to decode response body: {}", e),
        })
}
