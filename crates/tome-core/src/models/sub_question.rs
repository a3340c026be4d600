use serde::{Deserialize, Serialize};

use super::strategy::{QuestionKind, RetrievalStrategy};

/// A decomposed, self-contained question with its own retrieval strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubQuestion {
    /// Position in the decomposition order (0-based).
    pub index: usize,
    pub text: String,
    pub kind: QuestionKind,
    pub strategy: RetrievalStrategy,
}
