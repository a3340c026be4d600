use std::collections::BTreeSet;

use crate::errors::TomeResult;
use crate::models::{Chunk, MetadataPredicate};

/// Read interface of the session's document index.
///
/// Implementations hand out results from an immutable snapshot: a concurrent
/// document addition must never be observed as a partially rebuilt index.
pub trait IDocumentIndex: Send + Sync {
    /// Top-k chunks by embedding similarity, best first, scores >= 0.
    fn similarity_search(&self, embedding: &[f32], k: usize) -> TomeResult<Vec<(Chunk, f64)>>;

    /// Top-k chunks by lexical overlap, best first, scores >= 0.
    fn lexical_search(&self, query: &str, k: usize) -> TomeResult<Vec<(Chunk, f64)>>;

    /// Every chunk matching the AND-combined predicate (and document filter),
    /// in stable order: document name, then position, then id. Unbounded —
    /// this is the completeness guarantee exhaustive mode relies on.
    fn fetch_by_metadata(
        &self,
        predicate: &MetadataPredicate,
        document_filter: Option<&str>,
    ) -> TomeResult<Vec<Chunk>>;

    /// Names of all documents in the session.
    fn list_document_names(&self) -> TomeResult<BTreeSet<String>>;
}
