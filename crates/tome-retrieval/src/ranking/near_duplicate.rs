//! Near-duplicate filtering by content similarity.
//!
//! Catches overlap that id-based dedup cannot: the same passage arriving via
//! re-chunked or duplicate uploads of one document. Input order is priority
//! order; the first occurrence of a duplicate cluster survives.

use std::collections::{HashSet, BTreeSet};

use tracing::debug;

use tome_core::models::Candidate;

/// Drop every candidate whose content near-duplicates an earlier survivor.
///
/// Exact duplicates are caught by fingerprint; near duplicates by Jaccard
/// similarity over token sets at the mode-dependent `threshold` (looser in
/// Exhaustive mode so legitimately similar entries survive a count). Output
/// is an order-preserving subsequence of the input.
pub fn filter(candidates: Vec<Candidate>, threshold: f64) -> Vec<Candidate> {
    let mut seen_fingerprints: HashSet<String> = HashSet::new();
    let mut survivor_tokens: Vec<BTreeSet<String>> = Vec::new();
    let mut survivors: Vec<Candidate> = Vec::new();
    let input_len = candidates.len();

    for candidate in candidates {
        if !seen_fingerprints.insert(candidate.chunk.fingerprint.clone()) {
            continue;
        }
        let tokens = token_set(&candidate.chunk.text);
        let duplicate = survivor_tokens
            .iter()
            .any(|prior| jaccard(prior, &tokens) >= threshold);
        if duplicate {
            continue;
        }
        survivor_tokens.push(tokens);
        survivors.push(candidate);
    }

    if survivors.len() < input_len {
        debug!(
            input = input_len,
            kept = survivors.len(),
            threshold,
            "near-duplicate filter dropped candidates"
        );
    }
    survivors
}

fn token_set(text: &str) -> BTreeSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let intersection = a.intersection(b).count() as f64;
    let union = a.union(b).count() as f64;
    intersection / union
}
