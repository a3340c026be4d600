use serde::{Deserialize, Serialize};

use super::confidence::Confidence;

/// Result of answer-completeness validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether the evidence + answer look complete for the question.
    pub is_complete: bool,
    pub confidence: Confidence,
    /// Short explanation of the assessment, for logs and debugging.
    pub reasoning: String,
    /// Chunks in the context that was validated.
    pub chunk_count: usize,
    /// Distinct documents represented in that context.
    pub document_count: usize,
    /// User-facing notice, set only when completeness is in doubt.
    pub warning: Option<String>,
}

impl ValidationResult {
    /// A passing result with no warning attached.
    pub fn complete(chunk_count: usize, document_count: usize, reasoning: impl Into<String>) -> Self {
        Self {
            is_complete: true,
            confidence: Confidence::new(Confidence::HIGH),
            reasoning: reasoning.into(),
            chunk_count,
            document_count,
            warning: None,
        }
    }
}
