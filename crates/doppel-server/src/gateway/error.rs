use std::time::Duration;

use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode, header::RETRY_AFTER},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use doppel::constants::DOPPEL_STATUS_HEADER;
use doppel::{ErrorCategory, PipelineError};

pub const MSG_CONFIGURATION: &str =
    "Server configuration error: model name not found for a specified provider.";
pub const MSG_RESOURCE_NOT_FOUND: &str = "Resource not found at URL or could not be parsed.";
pub const MSG_AI_UNAVAILABLE: &str =
    "AI service provider is currently unavailable. Please try again later.";
pub const MSG_INTERNAL: &str = "An internal server error occurred.";
pub const MSG_INVALID_QUESTION: &str = "Invalid question provided";
pub const MSG_BAD_CREDENTIALS: &str = "Bad username or password";

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid question provided")]
    InvalidQuestion { reason: Option<String> },

    #[error("{0}")]
    Unauthorized(String),

    #[error("Bad username or password")]
    BadCredentials,

    #[error("rate limit exceeded, retry in {}s", retry_after_secs(.retry_after))]
    RateLimited { retry_after: Duration },

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("internal error: {0}")]
    InternalError(String),
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    pub category: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Whole seconds, rounded up, never below one.
pub(crate) fn retry_after_secs(retry_after: &Duration) -> u64 {
    let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
    secs.max(1)
}

fn pipeline_status(err: &PipelineError) -> (StatusCode, &'static str) {
    match err.category() {
        ErrorCategory::Configuration => (StatusCode::INTERNAL_SERVER_ERROR, MSG_CONFIGURATION),
        ErrorCategory::ResourceNotFound => (StatusCode::NOT_FOUND, MSG_RESOURCE_NOT_FOUND),
        ErrorCategory::AiServiceUnavailable => (StatusCode::SERVICE_UNAVAILABLE, MSG_AI_UNAVAILABLE),
        ErrorCategory::Internal => (StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL),
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();

        let (status, error_message, category, reason) = match &self {
            GatewayError::InvalidRequest(_) => {
                (StatusCode::BAD_REQUEST, self.to_string(), "invalid_request", None)
            }
            GatewayError::InvalidQuestion { reason } => (
                StatusCode::BAD_REQUEST,
                MSG_INVALID_QUESTION.to_string(),
                "invalid_question",
                reason.clone(),
            ),
            GatewayError::Unauthorized(_) => {
                (StatusCode::UNAUTHORIZED, self.to_string(), "unauthorized", None)
            }
            GatewayError::BadCredentials => (
                StatusCode::UNAUTHORIZED,
                MSG_BAD_CREDENTIALS.to_string(),
                "unauthorized",
                None,
            ),
            GatewayError::RateLimited { retry_after } => {
                headers.insert(RETRY_AFTER, HeaderValue::from(retry_after_secs(retry_after)));
                (StatusCode::TOO_MANY_REQUESTS, self.to_string(), "rate_limited", None)
            }
            GatewayError::Pipeline(err) => {
                let (status, message) = pipeline_status(err);
                if status.is_server_error() {
                    error!(category = %err.category(), error = %err, "Request failed");
                } else {
                    warn!(category = %err.category(), error = %err, "Request failed");
                }
                (status, message.to_string(), err.category().as_str(), None)
            }
            GatewayError::InternalError(detail) => {
                error!(error = %detail, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    MSG_INTERNAL.to_string(),
                    ErrorCategory::Internal.as_str(),
                    None,
                )
            }
        };

        headers.insert(DOPPEL_STATUS_HEADER, HeaderValue::from_static(category));

        let body = Json(ErrorResponse {
            error: error_message,
            code: status.as_u16(),
            category,
            reason,
        });

        (status, headers, body).into_response()
    }
}
