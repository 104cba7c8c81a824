use tracing::debug;

use super::cosine::cosine_similarity;
use super::error::SimilarityError;

/// A corpus item whose similarity to the query cleared the threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredMatch {
    /// Position in the corpus.
    pub index: usize,
    pub score: f64,
}

/// Threshold matching of one query vector against a corpus.
#[derive(Debug, Clone, Copy)]
pub struct SimilarityEngine {
    threshold: f64,
}

impl SimilarityEngine {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Similarity of `query` to every corpus vector, in corpus order.
    pub fn score(&self, query: &[f32], corpus: &[Vec<f32>]) -> Result<Vec<f64>, SimilarityError> {
        if query.is_empty() {
            return Err(SimilarityError::EmptyQuery);
        }

        corpus
            .iter()
            .enumerate()
            .map(|(index, v)| {
                if v.len() != query.len() {
                    return Err(SimilarityError::DimensionMismatch {
                        expected: query.len(),
                        found: v.len(),
                        index,
                    });
                }
                Ok(cosine_similarity(query, v))
            })
            .collect()
    }

    /// Corpus items scoring `>= threshold`, in corpus order.
    ///
    /// An empty result is a normal outcome, not an error.
    pub fn find_matches(
        &self,
        query: &[f32],
        corpus: &[Vec<f32>],
    ) -> Result<Vec<ScoredMatch>, SimilarityError> {
        let matches: Vec<ScoredMatch> = self
            .score(query, corpus)?
            .into_iter()
            .enumerate()
            .filter(|(_, score)| *score >= self.threshold)
            .map(|(index, score)| ScoredMatch { index, score })
            .collect();

        debug!(
            corpus = corpus.len(),
            matched = matches.len(),
            threshold = self.threshold,
            "Similarity scoring complete"
        );

        Ok(matches)
    }
}
