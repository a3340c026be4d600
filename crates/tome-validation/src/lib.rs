//! # tome-validation
//!
//! Post-answer completeness validation. Checks whether the assembled evidence
//! plausibly covers the question and whether the answer reflects it, and
//! attaches a user-facing notice when completeness is in doubt.
//!
//! Advisory by contract: validation never blocks or rewrites an answer, and
//! internal failures degrade to a chunk-count heuristic instead of erroring.

mod validator;

pub use validator::AnswerValidator;
