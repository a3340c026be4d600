//! Default values shared across the workspace.
//!
//! Config structs in [`crate::config`] pull their `Default` impls from here so
//! a TOML override and the compiled default can never drift apart silently.

/// Top-K for targeted factual questions.
pub const DEFAULT_SEMANTIC_TOP_K: usize = 20;

/// Top-K for open-ended questions that need broader recall.
pub const DEFAULT_BROAD_TOP_K: usize = 50;

/// Maximum assembled context size, in tokens.
pub const DEFAULT_CONTEXT_BUDGET_TOKENS: usize = 3000;

/// Reciprocal Rank Fusion smoothing constant.
pub const DEFAULT_RRF_K: u32 = 60;

/// Near-duplicate similarity threshold in Semantic mode (tighter).
pub const DEFAULT_SEMANTIC_DEDUP_THRESHOLD: f64 = 0.75;

/// Near-duplicate similarity threshold in Exhaustive mode (looser — counting
/// queries must not drop legitimately similar entries).
pub const DEFAULT_EXHAUSTIVE_DEDUP_THRESHOLD: f64 = 0.85;

/// Minimum chunk count the validator accepts in Semantic mode.
pub const DEFAULT_MIN_CHUNKS_SEMANTIC: usize = 3;

/// Minimum chunk count the validator accepts in Exhaustive mode. Lower than
/// the semantic minimum: an exhaustive scan already reflects true data
/// availability.
pub const DEFAULT_MIN_CHUNKS_EXHAUSTIVE: usize = 2;

/// Worker pool size for per-sub-question retrieval.
pub const DEFAULT_WORKER_THREADS: usize = 4;

/// Per-call timeout for reasoning-model calls, in seconds.
pub const DEFAULT_REASONING_TIMEOUT_SECS: u64 = 10;

/// How many conversation turns the rewriter sees.
pub const DEFAULT_HISTORY_WINDOW: usize = 6;

/// How many paraphrased query variants hybrid search may add for recall.
pub const DEFAULT_QUERY_VARIANTS: usize = 2;
