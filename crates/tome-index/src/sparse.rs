//! Sparse retrieval: tf-idf lexical overlap.

use std::collections::HashMap;

use tome_core::errors::TomeResult;
use tome_core::models::Chunk;

use crate::embedder::tokenize;
use crate::snapshot::IndexSnapshot;

/// Top-k chunks by tf-idf overlap with the query terms. Chunks with no
/// overlapping term are omitted. Ties break by chunk id.
pub fn search(snapshot: &IndexSnapshot, query: &str, k: usize) -> TomeResult<Vec<(Chunk, f64)>> {
    let query_terms = tokenize(query);
    if query_terms.is_empty() || snapshot.is_empty() {
        return Ok(Vec::new());
    }

    let n = snapshot.len() as f64;
    let mut scored: Vec<(usize, f64)> = Vec::new();

    for (i, chunk) in snapshot.chunks().iter().enumerate() {
        let chunk_terms = tokenize(&chunk.text);
        if chunk_terms.is_empty() {
            continue;
        }
        let mut tf: HashMap<&str, f64> = HashMap::new();
        for t in &chunk_terms {
            *tf.entry(t.as_str()).or_default() += 1.0;
        }
        let len = chunk_terms.len() as f64;

        let mut score = 0.0;
        for term in &query_terms {
            if let Some(count) = tf.get(term.as_str()) {
                let df = snapshot.doc_freq(term).max(1) as f64;
                let idf = (1.0 + n / df).ln();
                score += (count / len) * idf;
            }
        }
        if score > 0.0 {
            scored.push((i, score));
        }
    }

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

#[cfg(test)]
mod tests {
    use super::*;
    use tome_core::models::ChunkFlags;
    use uuid::Uuid;

    fn entry(id: &str, text: &str) -> (Chunk, Vec<f32>) {
        (
            Chunk::new(id, "a.pdf", 0, text, ChunkFlags::default(), Uuid::nil()),
            vec![0.0; 2],
        )
    }

    #[test]
    fn overlapping_chunk_ranks_above_disjoint() {
        let snap = IndexSnapshot::build(
            1,
            vec![
                entry("c1", "the project budget was approved in march"),
                entry("c2", "unrelated cooking recipe"),
            ],
            2,
        );
        let hits = search(&snap, "project budget", 5).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0.id, "c1");
    }

    #[test]
    fn rare_terms_outweigh_common_terms() {
        let snap = IndexSnapshot::build(
            1,
            vec![
                entry("common", "project project project"),
                entry("rare", "project milestone"),
                entry("other1", "project alpha"),
                entry("other2", "project beta"),
            ],
            2,
        );
        // "milestone" appears in one chunk, "project" in all four.
        let hits = search(&snap, "milestone", 5).unwrap();
        assert_eq!(hits[0].0.id, "rare");
    }

    #[test]
    fn empty_query_returns_empty() {
        let snap = IndexSnapshot::build(1, vec![entry("c1", "text")], 2);
        assert!(search(&snap, "?!", 5).unwrap().is_empty());
    }
}
