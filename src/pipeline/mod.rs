//! End-to-end duplicate detection: resolve, validate, fetch, normalize,
//! embed, then score or cluster.

mod detector;
mod error;
mod types;

#[cfg(test)]
mod tests;

pub use detector::DuplicateDetector;
pub use error::{ErrorCategory, PipelineError};
pub use types::{CheckOutcome, CheckRequest, GroupOutcome, GroupRequest};
