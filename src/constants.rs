//! Cross-cutting, shared constants.
//!
//! Thresholds and timeouts here are defaults only; [`crate::Config`] can override them.

/// Default cosine similarity cutoff used for both matching and clustering.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.85;

/// Upper bound on how long a corpus fetch may block.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 15;

/// Upper bound on a single embedding or reasoning call.
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 30;

/// Provider used when a request does not name one.
pub const DEFAULT_EMBEDDING_PROVIDER: &str = "gemini";

/// Provider used when a request does not name one.
pub const DEFAULT_REASONING_PROVIDER: &str = "gemini";

/// Suffix shared by every model configuration key (`GEMINI_EMBEDDING_MODEL`, ...).
pub const MODEL_KEY_SUFFIX: &str = "_MODEL";

/// Minimum corpus size for grouping.
pub const MIN_GROUP_CORPUS: usize = 2;

/// Response header carrying the outcome category of a request.
pub const DOPPEL_STATUS_HEADER: &str = "x-doppel-status";

pub const DOPPEL_STATUS_OK: &str = "ok";
pub const DOPPEL_STATUS_HEALTHY: &str = "healthy";

/// Field holding the question text inside corpus records.
pub const QUESTION_FIELD: &str = "Question";

pub const REASON_NO_EXISTING_QUESTIONS: &str = "No existing questions to compare against.";
pub const REASON_NOT_ENOUGH_QUESTIONS: &str = "Not enough questions to form a group.";
