/// Reasoning-model call errors. Always recovered locally by a fallback tier;
/// never surfaced as a query error.
#[derive(Debug, thiserror::Error)]
pub enum ReasoningError {
    #[error("reasoning call timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("reasoning call failed: {reason}")]
    CallFailed { reason: String },

    #[error("malformed reasoning response: {reason}")]
    MalformedResponse { reason: String },

    #[error("reasoning model unavailable: {model}")]
    Unavailable { model: String },
}
