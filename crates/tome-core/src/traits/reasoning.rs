use std::time::Duration;

use crate::errors::TomeResult;

/// One text-completion call. Carries its own deadline: implementations must
/// return `ReasoningError::Timeout` rather than block past it.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub prompt: String,
    pub timeout: Duration,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>, timeout: Duration) -> Self {
        Self {
            prompt: prompt.into(),
            timeout,
        }
    }
}

/// Reasoning-model backend for classification, rewriting, and validation.
/// Assumed fallible and slow; callers retry at most once and always have a
/// cheaper fallback tier.
pub trait ICompletionModel: Send + Sync {
    fn complete(&self, request: &CompletionRequest) -> TomeResult<String>;

    fn name(&self) -> &str;

    fn is_available(&self) -> bool {
        true
    }
}
