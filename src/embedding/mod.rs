//! Embedding generation behind one adapter.
//!
//! - [`EmbeddingBackend`] is the per-vendor seam ([`OpenAiEmbedder`], [`GeminiEmbedder`]).
//! - [`StubEmbedder`] gives deterministic vectors without network access.
//! - [`EmbeddingClient`] selects the backend and enforces batch invariants.

mod backend;
mod client;
mod error;
/// Gemini `batchEmbedContents` backend.
pub mod gemini;
mod http;
/// OpenAI `/embeddings` backend.
pub mod openai;
mod stub;

#[cfg(any(test, feature = "mock"))]
mod mock;


pub use backend::{Embedding, EmbeddingBackend};
pub use client::{EmbeddingClient, QueryEmbeddings};
pub use error::EmbeddingError;
pub use gemini::GeminiEmbedder;
pub use openai::OpenAiEmbedder;
pub use stub::{STUB_EMBEDDING_DIM, StubEmbedder};

#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbedder;
