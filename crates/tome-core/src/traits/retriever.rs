use crate::errors::TomeResult;
use crate::models::{AssembledContext, ConversationHistory};

/// The retrieval surface exposed to the generation/API layer.
pub trait IRetriever {
    /// Turn a question into a ranked, deduplicated, budget-bounded context.
    ///
    /// `document_filter` restricts retrieval to one uploaded document when the
    /// caller already knows the target.
    fn retrieve(
        &self,
        question: &str,
        history: &ConversationHistory,
        document_filter: Option<&str>,
    ) -> TomeResult<AssembledContext>;
}
