use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ClusteringError {
    #[error("vector {index} has dimension {found}, expected {expected}")]
    DimensionMismatch {
        expected: usize,
        found: usize,
        index: usize,
    },

    #[error("distance threshold must be a finite non-negative number, got {value}")]
    InvalidThreshold { value: f64 },
}
