//! The bounded, ordered context handed to the generation layer.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::candidate::ScoreSource;
use super::chunk::Chunk;
use super::strategy::RetrievalMode;

/// One chunk in the assembled context, with provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextEntry {
    pub chunk: Chunk,
    pub source: ScoreSource,
    /// Index of the sub-question this entry was retrieved for.
    pub sub_question: usize,
}

/// Ordered, deduplicated chunk sequence bounded by a token budget.
/// Built by round-robin merge across sub-question result lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssembledContext {
    pub entries: Vec<ContextEntry>,
    /// Total tokens across all entries. Invariant: `token_count <= budget`.
    pub token_count: usize,
    /// The budget this context was assembled under.
    pub budget: usize,
    /// Overall retrieval mode: `Exhaustive` only when every sub-question ran
    /// exhaustively, so the validator can trust the completeness guarantee.
    pub mode: RetrievalMode,
}

impl AssembledContext {
    /// An empty context — a legitimate result, not an error.
    pub fn empty(budget: usize, mode: RetrievalMode) -> Self {
        Self {
            entries: Vec::new(),
            token_count: 0,
            budget,
            mode,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct source documents represented in the context.
    pub fn document_names(&self) -> BTreeSet<&str> {
        self.entries
            .iter()
            .map(|e| e.chunk.document_name.as_str())
            .collect()
    }

    /// Concatenated chunk texts, in order, for prompt construction.
    pub fn joined_text(&self) -> String {
        self.entries
            .iter()
            .map(|e| e.chunk.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
