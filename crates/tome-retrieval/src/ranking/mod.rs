//! Post-search ranking: cross-encoder rerank → near-duplicate filter.

pub mod near_duplicate;
pub mod reranker;
