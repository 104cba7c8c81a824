//! Candidate question corpus: records and where they come from.

mod fetcher;
mod question;

#[cfg(any(test, feature = "mock"))]
mod mock;


pub use fetcher::{CorpusFetcher, HttpCorpusFetcher};
pub use question::{Question, parse_corpus};

#[cfg(any(test, feature = "mock"))]
pub use mock::StaticCorpusFetcher;
