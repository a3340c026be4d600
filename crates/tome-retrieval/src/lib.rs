//! # tome-retrieval
//!
//! The adaptive retrieval pipeline:
//!
//! question → rewrite/decompose → per sub-question: strategy routing →
//! (exhaustive scan) or (dense + sparse → RRF → rerank) → near-duplicate
//! filter → round-robin context assembly.
//!
//! Counting/listing questions take the exhaustive path (completeness over
//! precision); factual questions take the bounded hybrid path (precision and
//! latency). Every reasoning-model dependency degrades through cheaper tiers
//! instead of failing the query.

pub mod analyze;
pub mod assemble;
pub mod engine;
pub mod exhaustive;
pub mod expansion;
pub mod ranking;
pub mod reasoning;
pub mod rewrite;
pub mod search;

pub use engine::RetrievalEngine;
