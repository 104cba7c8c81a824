use serde::{Deserialize, Serialize};

use doppel::{CheckRequest, GroupRequest, Question};

use super::error::GatewayError;

#[derive(Debug, Clone, Deserialize)]
pub struct LoginPayload {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckSimilarityPayload {
    pub question: String,
    pub questions_url: String,
    #[serde(default)]
    pub embedding_provider: Option<String>,
    #[serde(default)]
    pub reasoning_provider: Option<String>,
}

impl CheckSimilarityPayload {
    pub fn into_request(self) -> Result<CheckRequest, GatewayError> {
        if self.question.trim().is_empty() {
            return Err(GatewayError::InvalidRequest(
                "'question' must be a non-empty string".to_string(),
            ));
        }
        validate_url(&self.questions_url)?;

        Ok(CheckRequest {
            question: self.question,
            questions_url: self.questions_url,
            embedding_provider: self.embedding_provider,
            reasoning_provider: self.reasoning_provider,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupPayload {
    pub questions_url: String,
    #[serde(default)]
    pub embedding_provider: Option<String>,
}

impl GroupPayload {
    pub fn into_request(self) -> Result<GroupRequest, GatewayError> {
        validate_url(&self.questions_url)?;

        Ok(GroupRequest {
            questions_url: self.questions_url,
            embedding_provider: self.embedding_provider,
        })
    }
}

/// Accepts absolute `http`/`https` URLs only.
pub fn validate_url(raw: &str) -> Result<(), GatewayError> {
    let url = reqwest::Url::parse(raw.trim()).map_err(|e| {
        GatewayError::InvalidRequest(format!("'questions_url' is not a valid URL: {}", e))
    })?;

    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(()),
        _ => Err(GatewayError::InvalidRequest(
            "'questions_url' must be an http(s) URL".to_string(),
        )),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub const ANSWER_YES: &str = "yes";
pub const ANSWER_NO: &str = "no";

#[derive(Debug, Clone, Serialize)]
pub struct CheckResponse {
    pub response: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_questions: Option<Vec<Question>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupResponse {
    pub response: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_groups: Option<Vec<Vec<Question>>>,
}
