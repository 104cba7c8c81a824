use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error};

use super::question::{Question, parse_corpus};

/// Source of candidate questions.
///
/// `None` means the location could not be reached or did not hold a list of
/// records. Fetch problems never surface as errors.
#[async_trait]
pub trait CorpusFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Option<Vec<Question>>;
}

/// Fetches a JSON array of records with a plain `GET`.
#[derive(Debug, Clone)]
pub struct HttpCorpusFetcher {
    http: reqwest::Client,
}

impl HttpCorpusFetcher {
    /// A fetcher whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl CorpusFetcher for HttpCorpusFetcher {
    async fn fetch(&self, url: &str) -> Option<Vec<Question>> {
        let response = match self.http.get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                error!(url = %url, error = %e, "Error fetching questions");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            error!(url = %url, status = %status, "Questions URL returned an error status");
            return None;
        }

        let body: serde_json::Value = match response.json().await {
            Ok(v) => v,
            Err(e) => {
                error!(url = %url, error = %e, "Questions URL did not return JSON");
                return None;
            }
        };

        let corpus = parse_corpus(body);
        match &corpus {
            Some(items) => debug!(url = %url, count = items.len(), "Fetched questions"),
            None => error!(url = %url, "Questions URL did not return a list of records"),
        }
        corpus
    }
}
