//! Exhaustive fetcher: the unbounded complete scan behind counting and
//! listing questions.

use tracing::info;

use tome_core::errors::TomeResult;
use tome_core::models::{Candidate, MetadataPredicate, RetrievalStrategy, ScoreSource};
use tome_core::traits::IDocumentIndex;

/// Fetch every chunk matching the strategy's metadata predicate and document
/// filter. Results come back in the index's stable order, uniformly scored —
/// exhaustive mode is unranked by design. An empty match is an empty vec,
/// never an error.
pub fn fetch(
    index: &dyn IDocumentIndex,
    strategy: &RetrievalStrategy,
) -> TomeResult<Vec<Candidate>> {
    let empty = MetadataPredicate::default();
    let predicate = strategy.metadata_filter.as_ref().unwrap_or(&empty);

    let chunks = index.fetch_by_metadata(predicate, strategy.document_filter.as_deref())?;
    info!(
        matched = chunks.len(),
        filtered = !predicate.is_empty(),
        document = strategy.document_filter.as_deref().unwrap_or("<all>"),
        "exhaustive scan complete"
    );

    Ok(chunks
        .into_iter()
        .map(|c| Candidate::new(c, 1.0, ScoreSource::Exhaustive))
        .collect())
}
