//! Cross-encoder reranking of an already-narrowed candidate set.
//!
//! Each (question, passage) pair is scored jointly — more expensive than
//! vector similarity, so this only runs on the bounded post-fusion set, and
//! never in Exhaustive mode where completeness outranks precision.

use tracing::{debug, warn};

use tome_core::models::Candidate;
use tome_core::traits::ICrossEncoder;

/// Rescore and reorder candidates. On encoder failure the pre-rerank order is
/// returned unchanged — degradation, not query failure. Deterministic for a
/// fixed encoder and input: descending score, ties by chunk id.
pub fn rerank(
    question: &str,
    mut candidates: Vec<Candidate>,
    encoder: &dyn ICrossEncoder,
) -> Vec<Candidate> {
    if candidates.is_empty() || !encoder.is_available() {
        return candidates;
    }

    let passages: Vec<String> = candidates.iter().map(|c| c.chunk.text.clone()).collect();
    let scores = match encoder.score_pairs(question, &passages) {
        Ok(scores) if scores.len() == candidates.len() => scores,
        Ok(scores) => {
            warn!(
                expected = candidates.len(),
                got = scores.len(),
                "cross-encoder returned wrong arity, keeping pre-rerank order"
            );
            return candidates;
        }
        Err(e) => {
            warn!(encoder = encoder.name(), error = %e, "rerank failed, keeping pre-rerank order");
            return candidates;
        }
    };

    for (candidate, score) in candidates.iter_mut().zip(scores) {
        candidate.rerank_score = Some(score.max(0.0));
    }
    candidates.sort_by(|a, b| {
        b.effective_score()
            .partial_cmp(&a.effective_score())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.chunk.id.cmp(&b.chunk.id))
    });

    debug!(count = candidates.len(), "rerank complete");
    candidates
}
