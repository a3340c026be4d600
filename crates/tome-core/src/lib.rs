//! # tome-core
//!
//! Foundation crate for the Tome retrieval system.
//! Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod tokens;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::TomeConfig;
pub use errors::{TomeError, TomeResult};
pub use models::{
    AssembledContext, Candidate, Chunk, ChunkFlags, Confidence, ConversationHistory,
    MetadataPredicate, RetrievalMode, RetrievalStrategy, ScoreSource, SubQuestion,
    ValidationResult,
};
