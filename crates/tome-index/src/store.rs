//! Session index: snapshot swapping plus the `IDocumentIndex` impl.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, RwLock};

use moka::sync::Cache;
use tracing::{debug, info};

use tome_core::errors::{IndexError, TomeResult};
use tome_core::models::{Chunk, MetadataPredicate};
use tome_core::traits::{IDocumentIndex, IEmbeddingProvider};

use crate::snapshot::IndexSnapshot;
use crate::{dense, sparse};

/// Embedding cache capacity. Chunks re-uploaded across batches (duplicate
/// documents are common) skip re-embedding.
const EMBED_CACHE_CAPACITY: u64 = 10_000;

/// The per-session document index.
///
/// Document addition is the sole writer and is serialized by `writer`; each
/// addition builds a complete new [`IndexSnapshot`] and swaps it in. Readers
/// clone the current `Arc` and never observe a partially rebuilt index.
pub struct SessionIndex {
    current: RwLock<Arc<IndexSnapshot>>,
    writer: Mutex<()>,
    embedder: Arc<dyn IEmbeddingProvider>,
    embed_cache: Cache<String, Arc<Vec<f32>>>,
}

impl SessionIndex {
    pub fn new(embedder: Arc<dyn IEmbeddingProvider>) -> Self {
        let dims = embedder.dimensions();
        Self {
            current: RwLock::new(Arc::new(IndexSnapshot::empty(dims))),
            writer: Mutex::new(()),
            embedder,
            embed_cache: Cache::new(EMBED_CACHE_CAPACITY),
        }
    }

    /// The current snapshot. Cheap; holds the read lock only for the clone.
    pub fn snapshot(&self) -> TomeResult<Arc<IndexSnapshot>> {
        let guard = self
            .current
            .read()
            .map_err(|_| IndexError::SnapshotUnavailable)?;
        Ok(Arc::clone(&guard))
    }

    /// Add an ingestion batch. Embeds the new chunks (cache-assisted), builds
    /// a new snapshot containing everything, and swaps it in atomically.
    pub fn add_chunks(&self, chunks: Vec<Chunk>) -> TomeResult<()> {
        let _writer = self
            .writer
            .lock()
            .map_err(|_| IndexError::SnapshotUnavailable)?;

        let previous = self.snapshot()?;
        let mut entries: Vec<(Chunk, Vec<f32>)> = previous
            .chunks()
            .iter()
            .cloned()
            .zip(previous.embeddings().iter().cloned())
            .collect();

        let added = chunks.len();
        for chunk in chunks {
            let embedding = self.embed_cached(&chunk)?;
            entries.push((chunk, embedding));
        }

        let next = Arc::new(IndexSnapshot::build(
            previous.version + 1,
            entries,
            self.embedder.dimensions(),
        ));
        info!(
            version = next.version,
            added,
            total = next.len(),
            "index snapshot rebuilt"
        );

        let mut guard = self
            .current
            .write()
            .map_err(|_| IndexError::SnapshotUnavailable)?;
        *guard = next;
        Ok(())
    }

    fn embed_cached(&self, chunk: &Chunk) -> TomeResult<Vec<f32>> {
        if let Some(hit) = self.embed_cache.get(&chunk.fingerprint) {
            debug!(chunk = %chunk.id, "embedding cache hit");
            return Ok((*hit).clone());
        }
        let embedding = self.embedder.embed(&chunk.text)?;
        self.embed_cache
            .insert(chunk.fingerprint.clone(), Arc::new(embedding.clone()));
        Ok(embedding)
    }
}

impl IDocumentIndex for SessionIndex {
    fn similarity_search(&self, embedding: &[f32], k: usize) -> TomeResult<Vec<(Chunk, f64)>> {
        let snapshot = self.snapshot()?;
        dense::search(&snapshot, embedding, k)
    }

    fn lexical_search(&self, query: &str, k: usize) -> TomeResult<Vec<(Chunk, f64)>> {
        let snapshot = self.snapshot()?;
        sparse::search(&snapshot, query, k)
    }

    fn fetch_by_metadata(
        &self,
        predicate: &MetadataPredicate,
        document_filter: Option<&str>,
    ) -> TomeResult<Vec<Chunk>> {
        Ok(self.snapshot()?.scan_metadata(predicate, document_filter))
    }

    fn list_document_names(&self) -> TomeResult<BTreeSet<String>> {
        Ok(self.snapshot()?.document_names())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedder::HashedBowEmbedder;
    use tome_core::models::ChunkFlags;
    use uuid::Uuid;

    fn index() -> SessionIndex {
        SessionIndex::new(Arc::new(HashedBowEmbedder::new(64)))
    }

    fn chunk(id: &str, doc: &str, text: &str) -> Chunk {
        Chunk::new(id, doc, 0, text, ChunkFlags::default(), Uuid::nil())
    }

    #[test]
    fn readers_keep_their_snapshot_across_additions() {
        let idx = index();
        idx.add_chunks(vec![chunk("c1", "a.pdf", "first batch")]).unwrap();

        let captured = idx.snapshot().unwrap();
        idx.add_chunks(vec![chunk("c2", "b.pdf", "second batch")]).unwrap();

        assert_eq!(captured.len(), 1);
        assert_eq!(idx.snapshot().unwrap().len(), 2);
        assert_eq!(captured.version + 1, idx.snapshot().unwrap().version);
    }

    #[test]
    fn lexical_search_sees_new_documents() {
        let idx = index();
        idx.add_chunks(vec![chunk("c1", "a.pdf", "quarterly budget report")])
            .unwrap();
        let hits = idx.lexical_search("budget", 5).unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn similarity_search_ranks_matching_text_first() {
        let idx = index();
        idx.add_chunks(vec![
            chunk("c1", "a.pdf", "quarterly budget report"),
            chunk("c2", "a.pdf", "unrelated cooking recipe"),
        ])
        .unwrap();
        let query = idx.embedder.embed("quarterly budget report").unwrap();
        let hits = idx.similarity_search(&query, 2).unwrap();
        assert_eq!(hits[0].0.id, "c1");
        assert!(hits[0].1 > hits[1].1);
    }

    #[test]
    fn empty_index_searches_are_empty_not_errors() {
        let idx = index();
        assert!(idx.lexical_search("anything", 5).unwrap().is_empty());
        assert!(idx
            .fetch_by_metadata(&MetadataPredicate::default(), None)
            .unwrap()
            .is_empty());
    }
}
