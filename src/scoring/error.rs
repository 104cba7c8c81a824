use thiserror::Error;

/// Vectors that cannot be compared. Always a programming or configuration
/// fault: both sides must come from the same model call.
#[derive(Debug, Error, PartialEq)]
pub enum SimilarityError {
    #[error("query vector is empty")]
    EmptyQuery,

    #[error("corpus vector {index} has dimension {found}, expected {expected}")]
    DimensionMismatch {
        expected: usize,
        found: usize,
        index: usize,
    },
}
