//! HTTP client helpers for tests.

use std::time::Duration;

use serde_json::{Value, json};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct TestClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

/// Status, `x-doppel-status` header and JSON body of a response.
#[derive(Debug)]
pub struct ApiResponse {
    pub status: u16,
    pub doppel_status: String,
    pub body: Value,
}

impl TestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
            token: None,
        }
    }

    fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{}", self.base_url, path)
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<ApiResponse, TestClientError> {
        let builder = match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };
        let resp = builder.send().await?;

        let status = resp.status().as_u16();
        let doppel_status = resp
            .headers()
            .get("x-doppel-status")
            .and_then(|h| h.to_str().ok())
            .unwrap_or("unknown")
            .to_string();
        let body = resp.json().await.unwrap_or(Value::Null);

        Ok(ApiResponse {
            status,
            doppel_status,
            body,
        })
    }

    pub async fn health(&self) -> Result<ApiResponse, TestClientError> {
        self.send(self.client.get(self.url("/health"))).await
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<ApiResponse, TestClientError> {
        let resp = self
            .send(
                self.client
                    .post(self.url("/login"))
                    .json(&json!({"username": username, "password": password})),
            )
            .await?;

        if let Some(token) = resp.body["access_token"].as_str() {
            self.token = Some(token.to_string());
        }
        Ok(resp)
    }

    pub async fn check_similarity(
        &self,
        question: &str,
        questions_url: &str,
    ) -> Result<ApiResponse, TestClientError> {
        self.send(
            self.client
                .post(self.url("/check_similarity"))
                .json(&json!({"question": question, "questions_url": questions_url})),
        )
        .await
    }

    pub async fn group(&self, questions_url: &str) -> Result<ApiResponse, TestClientError> {
        self.send(
            self.client
                .post(self.url("/group_similar_questions"))
                .json(&json!({"questions_url": questions_url})),
        )
        .await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TestClientError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}
