//! Transient per-query candidate: chunk + score + provenance.

use serde::{Deserialize, Serialize};

use super::chunk::Chunk;

/// Which stage produced a candidate's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    Dense,
    Sparse,
    /// RRF-fused dense + sparse.
    Hybrid,
    /// Complete-scan result, uniformly scored.
    Exhaustive,
}

/// A chunk under consideration for one sub-question. Created per query,
/// discarded after assembly.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub chunk: Chunk,
    /// Stage score, always >= 0.
    pub score: f64,
    pub source: ScoreSource,
    /// Cross-encoder score, present only after reranking.
    pub rerank_score: Option<f64>,
}

impl Candidate {
    pub fn new(chunk: Chunk, score: f64, source: ScoreSource) -> Self {
        Self {
            chunk,
            score: score.max(0.0),
            source,
            rerank_score: None,
        }
    }

    /// The score ranking should use: rerank score when present, stage score
    /// otherwise.
    pub fn effective_score(&self) -> f64 {
        self.rerank_score.unwrap_or(self.score)
    }
}
