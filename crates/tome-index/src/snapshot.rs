//! Immutable index snapshot.

use std::collections::{BTreeSet, HashMap};

use tome_core::models::{Chunk, MetadataPredicate};

/// One immutable version of the session index. Built whole on every document
/// addition; never mutated afterwards. Chunks are held in stable order
/// (document name, position, id) so metadata scans are deterministic.
pub struct IndexSnapshot {
    /// Monotonic version, bumped per rebuild.
    pub version: u64,
    chunks: Vec<Chunk>,
    /// Embedding per chunk, parallel to `chunks`.
    embeddings: Vec<Vec<f32>>,
    /// Document frequency per term, for sparse scoring.
    doc_freq: HashMap<String, usize>,
    dimensions: usize,
}

impl IndexSnapshot {
    /// An empty snapshot for a fresh session.
    pub fn empty(dimensions: usize) -> Self {
        Self {
            version: 0,
            chunks: Vec::new(),
            embeddings: Vec::new(),
            doc_freq: HashMap::new(),
            dimensions,
        }
    }

    /// Build a snapshot from chunk/embedding pairs. Sorts into stable order
    /// and recomputes term statistics.
    pub fn build(version: u64, mut entries: Vec<(Chunk, Vec<f32>)>, dimensions: usize) -> Self {
        entries.sort_by(|(a, _), (b, _)| {
            a.document_name
                .cmp(&b.document_name)
                .then(a.position.cmp(&b.position))
                .then(a.id.cmp(&b.id))
        });

        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        for (chunk, _) in &entries {
            let terms: BTreeSet<String> = crate::embedder::tokenize(&chunk.text).into_iter().collect();
            for term in terms {
                *doc_freq.entry(term).or_default() += 1;
            }
        }

        let (chunks, embeddings) = entries.into_iter().unzip();
        Self {
            version,
            chunks,
            embeddings,
            doc_freq,
            dimensions,
        }
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn embeddings(&self) -> &[Vec<f32>] {
        &self.embeddings
    }

    /// Document frequency of a term across chunks.
    pub fn doc_freq(&self, term: &str) -> usize {
        self.doc_freq.get(term).copied().unwrap_or(0)
    }

    /// All chunks matching the predicate (and document filter), in stable
    /// order, each exactly once. The unbounded scan behind exhaustive mode.
    pub fn scan_metadata(
        &self,
        predicate: &MetadataPredicate,
        document_filter: Option<&str>,
    ) -> Vec<Chunk> {
        self.chunks
            .iter()
            .filter(|c| predicate.matches(&c.flags))
            .filter(|c| document_filter.map_or(true, |d| c.document_name == d))
            .cloned()
            .collect()
    }

    pub fn document_names(&self) -> BTreeSet<String> {
        self.chunks
            .iter()
            .map(|c| c.document_name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tome_core::models::ChunkFlags;
    use uuid::Uuid;

    fn chunk(id: &str, doc: &str, pos: usize, text: &str, projects: bool) -> (Chunk, Vec<f32>) {
        let flags = ChunkFlags {
            contains_projects: projects,
            ..Default::default()
        };
        (Chunk::new(id, doc, pos, text, flags, Uuid::nil()), vec![0.0; 4])
    }

    #[test]
    fn build_sorts_into_stable_order() {
        let snap = IndexSnapshot::build(
            1,
            vec![
                chunk("c3", "b.pdf", 0, "three", false),
                chunk("c2", "a.pdf", 1, "two", false),
                chunk("c1", "a.pdf", 0, "one", false),
            ],
            4,
        );
        let ids: Vec<&str> = snap.chunks().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c2", "c3"]);
    }

    #[test]
    fn scan_respects_predicate_and_document_filter() {
        let snap = IndexSnapshot::build(
            1,
            vec![
                chunk("c1", "a.pdf", 0, "alpha project", true),
                chunk("c2", "a.pdf", 1, "no entities here", false),
                chunk("c3", "b.pdf", 0, "beta project", true),
            ],
            4,
        );
        let p = MetadataPredicate {
            contains_projects: Some(true),
            ..Default::default()
        };
        let hits = snap.scan_metadata(&p, Some("a.pdf"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "c1");
    }

    #[test]
    fn empty_scan_returns_empty_not_error() {
        let snap = IndexSnapshot::empty(4);
        let hits = snap.scan_metadata(&MetadataPredicate::default(), None);
        assert!(hits.is_empty());
    }
}
