//! Round-robin context assembly across sub-question result lists.

use std::collections::HashSet;

use tracing::debug;

use tome_core::models::{AssembledContext, Candidate, ContextEntry, RetrievalMode};
use tome_core::tokens::count_tokens;

/// Merge per-sub-question ranked lists into one bounded context.
///
/// One candidate per non-exhausted list per round, lists visited in
/// sub-question order, until every list is exhausted or the token budget is
/// reached. Every non-empty list gets a slot before any list gets a second
/// (while budget allows); a sub-question with zero results never blocks the
/// rest. Chunks already taken for an earlier sub-question are skipped, and a
/// candidate that would overflow the budget is skipped rather than aborting
/// the merge — the budget is never exceeded and overflow is never an error.
pub fn assemble(
    lists: &[Vec<Candidate>],
    budget: usize,
    mode: RetrievalMode,
) -> AssembledContext {
    let mut context = AssembledContext::empty(budget, mode);
    let mut cursors: Vec<usize> = vec![0; lists.len()];
    let mut taken: HashSet<String> = HashSet::new();

    loop {
        let mut progressed = false;
        for (list_idx, list) in lists.iter().enumerate() {
            while cursors[list_idx] < list.len() {
                let candidate = &list[cursors[list_idx]];
                cursors[list_idx] += 1;

                if !taken.insert(candidate.chunk.id.clone()) {
                    continue;
                }
                let tokens = count_tokens(&candidate.chunk.text);
                if context.token_count + tokens > budget {
                    // Over budget for this one; other (smaller) candidates may
                    // still fit, so consume and move on.
                    continue;
                }
                context.entries.push(ContextEntry {
                    chunk: candidate.chunk.clone(),
                    source: candidate.source,
                    sub_question: list_idx,
                });
                context.token_count += tokens;
                progressed = true;
                break;
            }
        }
        if !progressed {
            break;
        }
    }

    debug!(
        entries = context.len(),
        tokens = context.token_count,
        budget,
        "context assembled"
    );
    context
}

#[cfg(test)]
mod tests {
    use super::*;
    use tome_core::models::{Chunk, ChunkFlags, ScoreSource};
    use uuid::Uuid;

    fn candidate(id: &str, text: &str) -> Candidate {
        Candidate::new(
            Chunk::new(id, "a.pdf", 0, text, ChunkFlags::default(), Uuid::nil()),
            0.5,
            ScoreSource::Hybrid,
        )
    }

    fn semantic() -> RetrievalMode {
        RetrievalMode::Semantic { top_k: 20 }
    }

    #[test]
    fn round_robin_interleaves_lists() {
        let lists = vec![
            vec![candidate("a1", "alpha"), candidate("a2", "beta")],
            vec![candidate("b1", "gamma"), candidate("b2", "delta")],
        ];
        let ctx = assemble(&lists, 1000, semantic());
        let ids: Vec<&str> = ctx.entries.iter().map(|e| e.chunk.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "b1", "a2", "b2"]);
    }

    #[test]
    fn empty_list_never_blocks_others() {
        let lists = vec![
            Vec::new(),
            vec![candidate("b1", "gamma")],
            Vec::new(),
            vec![candidate("d1", "delta")],
        ];
        let ctx = assemble(&lists, 1000, semantic());
        assert_eq!(ctx.len(), 2);
    }

    #[test]
    fn budget_is_never_exceeded() {
        let lists = vec![vec![
            candidate("c1", "one two three four five"),
            candidate("c2", "six seven eight nine ten"),
            candidate("c3", "eleven twelve thirteen fourteen fifteen"),
        ]];
        let ctx = assemble(&lists, 8, semantic());
        assert!(ctx.token_count <= 8);
        assert!(ctx.len() < 3);
    }

    #[test]
    fn duplicate_chunks_across_lists_appear_once() {
        let lists = vec![
            vec![candidate("shared", "common chunk")],
            vec![candidate("shared", "common chunk"), candidate("b2", "extra")],
        ];
        let ctx = assemble(&lists, 1000, semantic());
        let ids: Vec<&str> = ctx.entries.iter().map(|e| e.chunk.id.as_str()).collect();
        assert_eq!(ids, vec!["shared", "b2"]);
    }

    #[test]
    fn each_nonempty_list_contributes_before_seconds() {
        let lists = vec![
            vec![candidate("a1", "one"), candidate("a2", "two")],
            vec![candidate("b1", "three")],
            vec![candidate("c1", "four")],
        ];
        let ctx = assemble(&lists, 1000, semantic());
        // First three entries are the first element of each list.
        let first_round: Vec<&str> = ctx.entries[..3]
            .iter()
            .map(|e| e.chunk.id.as_str())
            .collect();
        assert_eq!(first_round, vec!["a1", "b1", "c1"]);
    }

    #[test]
    fn all_empty_yields_legitimate_empty_context() {
        let ctx = assemble(&[Vec::new(), Vec::new()], 100, semantic());
        assert!(ctx.is_empty());
        assert_eq!(ctx.token_count, 0);
    }
}
