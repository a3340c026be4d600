/// Index-read errors. Surfaced to the caller as retrieval failures — the one
/// error class the pipeline does not absorb locally.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("index read failed: {reason}")]
    ReadFailed { reason: String },

    #[error("embedding dimension mismatch: index has {expected}, query has {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("no index snapshot available for session")]
    SnapshotUnavailable,
}
