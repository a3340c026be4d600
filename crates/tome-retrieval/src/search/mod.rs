//! Hybrid search: dense + sparse retrieval fused with RRF.

pub mod rrf;

use tracing::{debug, warn};

use tome_core::config::RetrievalConfig;
use tome_core::errors::TomeResult;
use tome_core::models::{Candidate, ScoreSource};
use tome_core::traits::{IDocumentIndex, IEmbeddingProvider};

/// Runs dense and sparse retrieval against the index and fuses the two
/// ranked lists. Chunks appearing in both lists are inherently boosted by the
/// fusion and marked `Hybrid`.
pub struct HybridSearcher<'a> {
    index: &'a dyn IDocumentIndex,
    embedder: &'a dyn IEmbeddingProvider,
    rrf_k: u32,
}

impl<'a> HybridSearcher<'a> {
    pub fn new(
        index: &'a dyn IDocumentIndex,
        embedder: &'a dyn IEmbeddingProvider,
        config: &RetrievalConfig,
    ) -> Self {
        Self {
            index,
            embedder,
            rrf_k: config.rrf_k,
        }
    }

    /// Fused top results for one query. If embedding fails, degrades to
    /// sparse-only retrieval rather than failing the sub-question; index-read
    /// errors do surface.
    pub fn search(&self, query: &str, top_k: usize) -> TomeResult<Vec<Candidate>> {
        let dense = match self.embedder.embed(query) {
            Ok(embedding) => self.index.similarity_search(&embedding, top_k)?,
            Err(e) => {
                warn!(error = %e, "query embedding failed, degrading to sparse-only");
                Vec::new()
            }
        };
        let sparse = self.index.lexical_search(query, top_k)?;

        debug!(
            dense = dense.len(),
            sparse = sparse.len(),
            "hybrid search gathered candidate lists"
        );

        let fused = rrf::fuse(
            &[(ScoreSource::Dense, dense), (ScoreSource::Sparse, sparse)],
            self.rrf_k,
        );
        Ok(fused.into_iter().take(top_k).collect())
    }
}
