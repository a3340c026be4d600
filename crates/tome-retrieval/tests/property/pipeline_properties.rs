//! Property tests for the pipeline's order, bound, and partition invariants.

use proptest::prelude::*;

use tome_core::models::{
    Candidate, Chunk, ChunkFlags, EntityCategory, MetadataPredicate, RetrievalMode, ScoreSource,
};
use tome_retrieval::ranking::near_duplicate;
use tome_retrieval::search::rrf;
use tome_retrieval::assemble::assemble;

fn chunk(id: String, text: String, flags: ChunkFlags) -> Chunk {
    Chunk::new(id, "doc.pdf", 0, text, flags, uuid::Uuid::nil())
}

fn arb_text() -> impl Strategy<Value = String> {
    proptest::collection::vec("[a-z]{2,8}", 1..12).prop_map(|words| words.join(" "))
}

fn arb_candidates(max: usize) -> impl Strategy<Value = Vec<Candidate>> {
    proptest::collection::vec((arb_text(), 0.0f64..1.0), 0..max).prop_map(|items| {
        items
            .into_iter()
            .enumerate()
            .map(|(i, (text, score))| {
                Candidate::new(
                    chunk(format!("c{i}"), text, ChunkFlags::default()),
                    score,
                    ScoreSource::Hybrid,
                )
            })
            .collect()
    })
}

fn arb_flags() -> impl Strategy<Value = ChunkFlags> {
    (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(projects, people, dates, locations)| ChunkFlags {
            contains_projects: projects,
            contains_people: people,
            contains_dates: dates,
            contains_locations: locations,
            category: None,
        },
    )
}

proptest! {
    /// The dedup filter returns an order-preserving subsequence with no two
    /// survivors sharing a fingerprint.
    #[test]
    fn dedup_output_is_a_clean_subsequence(
        input in arb_candidates(24),
        threshold in 0.5f64..1.0,
    ) {
        let input_ids: Vec<String> =
            input.iter().map(|c| c.chunk.id.clone()).collect();
        let output = near_duplicate::filter(input, threshold);

        // Subsequence: output ids appear in input order.
        let mut cursor = 0;
        for candidate in &output {
            let pos = input_ids[cursor..]
                .iter()
                .position(|id| *id == candidate.chunk.id);
            prop_assert!(pos.is_some());
            cursor += pos.unwrap_or(0) + 1;
        }

        let mut fingerprints: Vec<&str> =
            output.iter().map(|c| c.chunk.fingerprint.as_str()).collect();
        fingerprints.sort_unstable();
        let before = fingerprints.len();
        fingerprints.dedup();
        prop_assert_eq!(before, fingerprints.len());
    }

    /// Assembly never exceeds the budget, never repeats a chunk, and every
    /// entry traces back to the list its sub-question index names.
    #[test]
    fn assembly_is_bounded_unique_and_attributed(
        lists in proptest::collection::vec(arb_candidates(10), 0..5),
        budget in 0usize..200,
    ) {
        // Ids repeat across lists (the same chunk retrieved for several
        // sub-questions), which is exactly what assembly must deduplicate.
        let context = assemble(&lists, budget, RetrievalMode::Semantic { top_k: 20 });

        prop_assert!(context.token_count <= budget);

        let mut ids: Vec<&str> =
            context.entries.iter().map(|e| e.chunk.id.as_str()).collect();
        ids.sort_unstable();
        let before = ids.len();
        ids.dedup();
        prop_assert_eq!(before, ids.len());

        for entry in &context.entries {
            prop_assert!(entry.sub_question < lists.len());
            prop_assert!(lists[entry.sub_question]
                .iter()
                .any(|c| c.chunk.id == entry.chunk.id));
        }
    }

    /// RRF output is sorted by descending fused score, and chunks present in
    /// both input lists are marked Hybrid.
    #[test]
    fn rrf_fusion_orders_and_attributes(
        dense in arb_candidates(12),
        sparse in arb_candidates(12),
    ) {
        let dense_pairs: Vec<(Chunk, f64)> =
            dense.iter().map(|c| (c.chunk.clone(), c.score)).collect();
        let sparse_pairs: Vec<(Chunk, f64)> =
            sparse.iter().map(|c| (c.chunk.clone(), c.score)).collect();
        let dense_ids: Vec<&str> =
            dense_pairs.iter().map(|(c, _)| c.id.as_str()).collect();
        let sparse_ids: Vec<&str> =
            sparse_pairs.iter().map(|(c, _)| c.id.as_str()).collect();

        let fused = rrf::fuse(
            &[
                (ScoreSource::Dense, dense_pairs.clone()),
                (ScoreSource::Sparse, sparse_pairs.clone()),
            ],
            60,
        );

        for pair in fused.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
        for candidate in &fused {
            let id = candidate.chunk.id.as_str();
            let in_both = dense_ids.contains(&id) && sparse_ids.contains(&id);
            if in_both {
                prop_assert_eq!(candidate.source, ScoreSource::Hybrid);
            }
            prop_assert!(candidate.score > 0.0);
        }
    }

    /// Decomposition never comes back empty, even with the reasoning model
    /// down: the final tier is the literal question.
    #[test]
    fn decomposition_is_never_empty(question in "[ -~]{1,80}") {
        prop_assume!(!question.trim().is_empty());
        let rewriter = tome_retrieval::rewrite::QueryRewriter::new(
            std::sync::Arc::new(test_fixtures::ScriptedCompletionModel::failing()),
            tome_core::config::RetrievalConfig::default(),
        );
        let subs = rewriter.rewrite(
            &question,
            &tome_core::models::ConversationHistory::empty(),
        );
        prop_assert!(!subs.is_empty());
        prop_assert!(subs.iter().all(|s| !s.trim().is_empty()));
    }

    /// A metadata scan partitions the corpus: every chunk either matches the
    /// predicate and is returned, or does not and is absent.
    #[test]
    fn metadata_scan_partitions_the_corpus(
        specs in proptest::collection::vec((arb_text(), arb_flags()), 0..20),
    ) {
        let chunks: Vec<Chunk> = specs
            .into_iter()
            .enumerate()
            .map(|(i, (text, flags))| chunk(format!("c{i}"), text, flags))
            .collect();

        let embedder = std::sync::Arc::new(tome_index::HashedBowEmbedder::new(32));
        let index = tome_index::SessionIndex::new(embedder);
        index.add_chunks(chunks.clone()).unwrap();

        let predicate = MetadataPredicate::for_entity(EntityCategory::Projects);
        let fetched = {
            use tome_core::traits::IDocumentIndex;
            index.fetch_by_metadata(&predicate, None).unwrap()
        };

        let fetched_ids: std::collections::BTreeSet<&str> =
            fetched.iter().map(|c| c.id.as_str()).collect();
        for chunk in &chunks {
            prop_assert_eq!(
                fetched_ids.contains(chunk.id.as_str()),
                predicate.matches(&chunk.flags)
            );
        }
    }
}
