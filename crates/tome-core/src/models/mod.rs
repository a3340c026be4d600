//! Data model for the retrieval core.

mod assembled_context;
mod candidate;
mod chunk;
mod confidence;
mod history;
mod strategy;
mod sub_question;
mod validation_result;

pub use assembled_context::{AssembledContext, ContextEntry};
pub use candidate::{Candidate, ScoreSource};
pub use chunk::{Chunk, ChunkFlags};
pub use confidence::Confidence;
pub use history::{ConversationHistory, ConversationTurn};
pub use strategy::{EntityCategory, MetadataPredicate, QuestionKind, RetrievalMode, RetrievalStrategy};
pub use sub_question::SubQuestion;
pub use validation_result::ValidationResult;
