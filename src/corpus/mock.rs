use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::fetcher::CorpusFetcher;
use super::question::Question;

/// In-memory fetcher keyed by URL. Unknown URLs are "not found".
#[derive(Default)]
pub struct StaticCorpusFetcher {
    corpora: HashMap<String, Vec<Question>>,
    calls: AtomicUsize,
}

impl StaticCorpusFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_corpus(mut self, url: impl Into<String>, corpus: Vec<Question>) -> Self {
        self.corpora.insert(url.into(), corpus);
        self
    }

    /// Registers `texts` as plain `Question` records.
    pub fn with_texts(self, url: impl Into<String>, texts: &[&str]) -> Self {
        let corpus = texts.iter().map(|t| Question::from_text(*t)).collect();
        self.with_corpus(url, corpus)
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CorpusFetcher for StaticCorpusFetcher {
    async fn fetch(&self, url: &str) -> Option<Vec<Question>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.corpora.get(url).cloned()
    }
}
