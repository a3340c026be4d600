/// Retrieval pipeline errors. Search and ranking failures are absorbed by
/// fallback tiers, so only setup failures remain here.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("worker pool construction failed: {reason}")]
    WorkerPool { reason: String },
}
