//! Error types, one enum per subsystem, unified under [`TomeError`].

mod embedding_error;
mod index_error;
mod reasoning_error;
mod retrieval_error;

pub use embedding_error::EmbeddingError;
pub use index_error::IndexError;
pub use reasoning_error::ReasoningError;
pub use retrieval_error::RetrievalError;

/// Unified error type for the whole workspace.
#[derive(Debug, thiserror::Error)]
pub enum TomeError {
    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Reasoning(#[from] ReasoningError),

    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result alias used across the workspace.
pub type TomeResult<T> = Result<T, TomeError>;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse error: {reason}")]
    Parse { reason: String },
}
