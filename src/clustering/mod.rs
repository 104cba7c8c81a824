//! Threshold-based agglomerative clustering of embedding vectors.

mod agglomerative;
mod error;


pub use agglomerative::{AgglomerativeClustering, ClusterAssignment, Merge};
pub use error::ClusteringError;
