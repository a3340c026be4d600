//! Reciprocal Rank Fusion: score = Σ 1/(k + rank_i)
//!
//! Combines ranked lists from different retrieval methods into one fused
//! ranking without normalizing their incomparable score scales.

use std::collections::HashMap;

use tome_core::models::{Candidate, Chunk, ScoreSource};

/// Fuse ranked `(chunk, score)` lists, one per retrieval method. `k` is the
/// smoothing constant (default 60); higher k flattens the influence of top
/// ranks from any single list. Ranks are 1-based. Output is deterministic and
/// duplicate-free: descending fused score, ties broken by chunk id.
///
/// A chunk present in more than one list accumulates one RRF term per list —
/// the built-in boost for dense+sparse agreement — and is marked `Hybrid`.
pub fn fuse(ranked_lists: &[(ScoreSource, Vec<(Chunk, f64)>)], k: u32) -> Vec<Candidate> {
    let mut scores: HashMap<String, (Chunk, f64, Vec<ScoreSource>)> = HashMap::new();

    for (source, list) in ranked_lists {
        for (rank, (chunk, _)) in list.iter().enumerate() {
            let rrf = 1.0 / (f64::from(k) + rank as f64 + 1.0);
            let entry = scores
                .entry(chunk.id.clone())
                .or_insert_with(|| (chunk.clone(), 0.0, Vec::new()));
            entry.1 += rrf;
            entry.2.push(*source);
        }
    }

    let mut candidates: Vec<Candidate> = scores
        .into_values()
        .map(|(chunk, score, sources)| {
            let source = match sources.as_slice() {
                [single] => *single,
                _ => ScoreSource::Hybrid,
            };
            Candidate::new(chunk, score, source)
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.chunk.id.cmp(&b.chunk.id))
    });

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use tome_core::models::ChunkFlags;
    use uuid::Uuid;

    fn chunk(id: &str) -> Chunk {
        Chunk::new(id, "a.pdf", 0, id, ChunkFlags::default(), Uuid::nil())
    }

    fn scored(source: ScoreSource, ids: &[&str]) -> (ScoreSource, Vec<(Chunk, f64)>) {
        (source, ids.iter().map(|id| (chunk(id), 1.0)).collect())
    }

    #[test]
    fn chunk_in_both_lists_wins() {
        let fused = fuse(
            &[
                scored(ScoreSource::Dense, &["a", "b"]),
                scored(ScoreSource::Sparse, &["c", "b"]),
            ],
            60,
        );
        assert_eq!(fused[0].chunk.id, "b");
        assert_eq!(fused[0].source, ScoreSource::Hybrid);
    }

    #[test]
    fn single_list_keeps_its_provenance() {
        let fused = fuse(&[scored(ScoreSource::Sparse, &["a"])], 60);
        assert_eq!(fused[0].source, ScoreSource::Sparse);
    }

    #[test]
    fn output_has_no_duplicates() {
        let fused = fuse(
            &[
                scored(ScoreSource::Dense, &["a", "b"]),
                scored(ScoreSource::Sparse, &["b", "a"]),
            ],
            60,
        );
        assert_eq!(fused.len(), 2);
    }

    #[test]
    fn ties_break_by_chunk_id() {
        // Same rank in disjoint lists → equal score → id order.
        let fused = fuse(
            &[
                scored(ScoreSource::Dense, &["zed"]),
                scored(ScoreSource::Sparse, &["abc"]),
            ],
            60,
        );
        assert_eq!(fused[0].chunk.id, "abc");
        assert_eq!(fused[1].chunk.id, "zed");
    }

    #[test]
    fn empty_input_is_empty() {
        assert!(fuse(&[], 60).is_empty());
    }

    #[test]
    fn scores_decrease_with_rank() {
        let fused = fuse(&[scored(ScoreSource::Dense, &["a", "b", "c"])], 60);
        assert!(fused[0].score > fused[1].score);
        assert!(fused[1].score > fused[2].score);
    }
}
