//! Dense retrieval: cosine similarity over snapshot embeddings.

use tome_core::errors::{IndexError, TomeResult};
use tome_core::models::Chunk;

use crate::snapshot::IndexSnapshot;

/// Top-k chunks by cosine similarity against `query`. Negative similarities
/// are clamped to zero so scores stay non-negative. Ties break by chunk id.
pub fn search(
    snapshot: &IndexSnapshot,
    query: &[f32],
    k: usize,
) -> TomeResult<Vec<(Chunk, f64)>> {
    if query.len() != snapshot.dimensions() {
        return Err(IndexError::DimensionMismatch {
            expected: snapshot.dimensions(),
            actual: query.len(),
        }
        .into());
    }

    let mut scored: Vec<(usize, f64)> = snapshot
        .embeddings()
        .iter()
        .enumerate()
        .map(|(i, emb)| (i, cosine(query, emb).max(0.0)))
        .collect();

    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| snapshot.chunks()[a.0].id.cmp(&snapshot.chunks()[b.0].id))
    });

    Ok(scored
        .into_iter()
        .take(k)
        .map(|(i, score)| (snapshot.chunks()[i].clone(), score))
        .collect())
}

fn cosine(a: &[f32], b: &[f32]) -> f64 {
    let mut dot = 0.0f64;
    let mut na = 0.0f64;
    let mut nb = 0.0f64;
    for (x, y) in a.iter().zip(b) {
        dot += f64::from(*x) * f64::from(*y);
        na += f64::from(*x) * f64::from(*x);
        nb += f64::from(*y) * f64::from(*y);
    }
    if na <= f64::EPSILON || nb <= f64::EPSILON {
        return 0.0;
    }
    dot / (na.sqrt() * nb.sqrt())
}
