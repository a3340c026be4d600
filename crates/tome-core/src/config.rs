//! Configuration for the retrieval and validation subsystems.
//!
//! Defaults are compiled in from [`crate::constants`]; a TOML file can
//! override any subset of fields (`#[serde(default)]` everywhere).

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::errors::{ConfigError, TomeResult};

/// Retrieval pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Top-K for targeted factual questions.
    pub semantic_top_k: usize,
    /// Top-K for open-ended questions.
    pub broad_top_k: usize,
    /// Assembled context budget, in tokens.
    pub context_budget_tokens: usize,
    /// RRF smoothing constant.
    pub rrf_k: u32,
    /// Near-duplicate threshold in Semantic mode.
    pub semantic_dedup_threshold: f64,
    /// Near-duplicate threshold in Exhaustive mode.
    pub exhaustive_dedup_threshold: f64,
    /// Whether hybrid search generates paraphrased query variants.
    pub query_expansion: bool,
    /// Maximum paraphrased variants per query.
    pub max_query_variants: usize,
    /// Worker pool size for parallel sub-question retrieval.
    pub worker_threads: usize,
    /// Per-call timeout for reasoning-model calls, in seconds.
    pub reasoning_timeout_secs: u64,
    /// Conversation turns visible to the rewriter.
    pub history_window: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            semantic_top_k: constants::DEFAULT_SEMANTIC_TOP_K,
            broad_top_k: constants::DEFAULT_BROAD_TOP_K,
            context_budget_tokens: constants::DEFAULT_CONTEXT_BUDGET_TOKENS,
            rrf_k: constants::DEFAULT_RRF_K,
            semantic_dedup_threshold: constants::DEFAULT_SEMANTIC_DEDUP_THRESHOLD,
            exhaustive_dedup_threshold: constants::DEFAULT_EXHAUSTIVE_DEDUP_THRESHOLD,
            query_expansion: true,
            max_query_variants: constants::DEFAULT_QUERY_VARIANTS,
            worker_threads: constants::DEFAULT_WORKER_THREADS,
            reasoning_timeout_secs: constants::DEFAULT_REASONING_TIMEOUT_SECS,
            history_window: constants::DEFAULT_HISTORY_WINDOW,
        }
    }
}

impl RetrievalConfig {
    /// Dedup threshold for the given mode.
    pub fn dedup_threshold(&self, exhaustive: bool) -> f64 {
        if exhaustive {
            self.exhaustive_dedup_threshold
        } else {
            self.semantic_dedup_threshold
        }
    }

    /// Per-call reasoning timeout as a `Duration`.
    pub fn reasoning_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.reasoning_timeout_secs)
    }
}

/// Answer-validation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Minimum chunk count accepted in Semantic mode.
    pub min_chunks_semantic: usize,
    /// Minimum chunk count accepted in Exhaustive mode.
    pub min_chunks_exhaustive: usize,
    /// Per-call timeout for the validation reasoning call, in seconds.
    pub reasoning_timeout_secs: u64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_chunks_semantic: constants::DEFAULT_MIN_CHUNKS_SEMANTIC,
            min_chunks_exhaustive: constants::DEFAULT_MIN_CHUNKS_EXHAUSTIVE,
            reasoning_timeout_secs: constants::DEFAULT_REASONING_TIMEOUT_SECS,
        }
    }
}

impl ValidationConfig {
    /// Minimum acceptable chunk count for the given mode.
    pub fn min_chunks(&self, exhaustive: bool) -> usize {
        if exhaustive {
            self.min_chunks_exhaustive
        } else {
            self.min_chunks_semantic
        }
    }
}

/// Top-level configuration: one section per subsystem.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomeConfig {
    pub retrieval: RetrievalConfig,
    pub validation: ValidationConfig,
}

impl TomeConfig {
    /// Parse a TOML override. Missing fields keep their compiled defaults.
    pub fn from_toml_str(raw: &str) -> TomeResult<Self> {
        let config: Self = toml::from_str(raw).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let c = RetrievalConfig::default();
        assert_eq!(c.semantic_top_k, 20);
        assert_eq!(c.broad_top_k, 50);
        assert_eq!(c.rrf_k, 60);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let raw = "[retrieval]\nsemantic_top_k = 7\n";
        let c = TomeConfig::from_toml_str(raw).unwrap();
        assert_eq!(c.retrieval.semantic_top_k, 7);
        assert_eq!(c.retrieval.broad_top_k, 50);
        assert_eq!(c.validation.min_chunks_semantic, 3);
    }

    #[test]
    fn dedup_threshold_is_mode_dependent() {
        let c = RetrievalConfig::default();
        assert!(c.dedup_threshold(true) > c.dedup_threshold(false));
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(TomeConfig::from_toml_str("not toml [").is_err());
    }
}
