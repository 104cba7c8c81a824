use crate::corpus::Question;

/// Input of a single-question duplicate check.
///
/// Provider names left as `None` fall back to the detector's defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckRequest {
    pub question: String,
    pub questions_url: String,
    pub embedding_provider: Option<String>,
    pub reasoning_provider: Option<String>,
}

impl CheckRequest {
    pub fn new(question: impl Into<String>, questions_url: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            questions_url: questions_url.into(),
            embedding_provider: None,
            reasoning_provider: None,
        }
    }

    pub fn with_embedding_provider(mut self, provider: impl Into<String>) -> Self {
        self.embedding_provider = Some(provider.into());
        self
    }

    pub fn with_reasoning_provider(mut self, provider: impl Into<String>) -> Self {
        self.reasoning_provider = Some(provider.into());
        self
    }
}

/// Input of a corpus grouping run.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupRequest {
    pub questions_url: String,
    pub embedding_provider: Option<String>,
}

impl GroupRequest {
    pub fn new(questions_url: impl Into<String>) -> Self {
        Self {
            questions_url: questions_url.into(),
            embedding_provider: None,
        }
    }

    pub fn with_embedding_provider(mut self, provider: impl Into<String>) -> Self {
        self.embedding_provider = Some(provider.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    /// The validator rejected the question; nothing was fetched.
    InvalidQuestion { reason: Option<String> },
    /// The corpus was fetched but empty.
    NoExistingQuestions,
    NoMatch,
    /// Matching records, in corpus order.
    Matched(Vec<Question>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum GroupOutcome {
    /// Fewer than two records; nothing was embedded.
    NotEnoughItems,
    NoGroups,
    /// Duplicate clusters of two or more records each.
    Groups(Vec<Vec<Question>>),
}
