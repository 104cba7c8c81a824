//! Cosine similarity and threshold matching.

mod cosine;
mod engine;
mod error;


pub use cosine::{cosine_distance, cosine_similarity};
pub use engine::{ScoredMatch, SimilarityEngine};
pub use error::SimilarityError;
