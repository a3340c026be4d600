use crate::models::{AssembledContext, ValidationResult};

/// Answer-completeness validation surface.
///
/// Infallible by contract: internal failures degrade to a chunk-count
/// heuristic, never block answer delivery.
pub trait IAnswerValidator {
    fn validate(&self, question: &str, answer: &str, context: &AssembledContext)
        -> ValidationResult;
}
