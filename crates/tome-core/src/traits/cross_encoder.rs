use crate::errors::TomeResult;

/// Pairwise (question, passage) relevance model.
///
/// More expensive than vector similarity, so it only ever sees an
/// already-narrowed candidate set.
pub trait ICrossEncoder: Send + Sync {
    /// Score each passage jointly with the question. Returns one score per
    /// passage, in input order, each >= 0.
    fn score_pairs(&self, question: &str, passages: &[String]) -> TomeResult<Vec<f64>>;

    fn name(&self) -> &str;

    fn is_available(&self) -> bool {
        true
    }
}
