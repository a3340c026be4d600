//! Shared fixtures for integration tests across crates: a small project
//! corpus with entity flags, plus scripted collaborator mocks.

use std::sync::Mutex;
use std::time::Duration;

use uuid::Uuid;

use tome_core::errors::{ReasoningError, TomeResult};
use tome_core::models::{Chunk, ChunkFlags};
use tome_core::traits::{CompletionRequest, ICompletionModel, ICrossEncoder};

/// Build a chunk with explicit flags.
pub fn chunk_with_flags(
    id: &str,
    document: &str,
    position: usize,
    text: &str,
    flags: ChunkFlags,
) -> Chunk {
    Chunk::new(id, document, position, text, flags, Uuid::nil())
}

/// Build a plain chunk with no entity flags.
pub fn chunk(id: &str, document: &str, position: usize, text: &str) -> Chunk {
    chunk_with_flags(id, document, position, text, ChunkFlags::default())
}

fn project_flags() -> ChunkFlags {
    ChunkFlags {
        contains_projects: true,
        ..Default::default()
    }
}

/// The corpus behind the counting scenario: Budget.pdf has exactly 4 chunks
/// flagged `contains_projects`, plus untagged filler and a second document.
pub fn budget_corpus() -> Vec<Chunk> {
    vec![
        chunk_with_flags(
            "b1",
            "Budget.pdf",
            0,
            "Project Atlas: cloud migration, allocated 1.2M for fiscal 2026.",
            project_flags(),
        ),
        chunk_with_flags(
            "b2",
            "Budget.pdf",
            1,
            "Project Borealis: data platform rebuild, allocated 800K.",
            project_flags(),
        ),
        chunk_with_flags(
            "b3",
            "Budget.pdf",
            2,
            "Project Cedar: office relocation, allocated 300K.",
            project_flags(),
        ),
        chunk_with_flags(
            "b4",
            "Budget.pdf",
            3,
            "Project Dune: compliance automation, allocated 450K.",
            project_flags(),
        ),
        chunk(
            "b5",
            "Budget.pdf",
            4,
            "General overhead and contingency reserves are reviewed quarterly.",
        ),
        chunk(
            "t1",
            "Timeline.pdf",
            0,
            "The overall program timeline spans January through November.",
        ),
        chunk(
            "t2",
            "Timeline.pdf",
            1,
            "Milestone reviews are scheduled at the end of each quarter.",
        ),
    ]
}

/// A completion model that replays scripted responses in order, then fails.
/// Thread-safe so it can sit behind an `Arc` in pipeline tests.
pub struct ScriptedCompletionModel {
    responses: Mutex<Vec<String>>,
}

impl ScriptedCompletionModel {
    pub fn new(responses: Vec<&str>) -> Self {
        let mut responses: Vec<String> = responses.into_iter().map(String::from).collect();
        responses.reverse();
        Self {
            responses: Mutex::new(responses),
        }
    }

    /// A model whose every call fails, for exercising fallback tiers.
    pub fn failing() -> Self {
        Self::new(vec![])
    }
}

impl ICompletionModel for ScriptedCompletionModel {
    fn complete(&self, _request: &CompletionRequest) -> TomeResult<String> {
        let mut guard = self.responses.lock().unwrap_or_else(|e| e.into_inner());
        guard.pop().ok_or_else(|| {
            ReasoningError::CallFailed {
                reason: "script exhausted".to_string(),
            }
            .into()
        })
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// A completion model that always times out.
pub struct TimeoutCompletionModel;

impl ICompletionModel for TimeoutCompletionModel {
    fn complete(&self, request: &CompletionRequest) -> TomeResult<String> {
        Err(ReasoningError::Timeout {
            secs: request.timeout.as_secs(),
        }
        .into())
    }

    fn name(&self) -> &str {
        "timeout-mock"
    }
}

/// Cross-encoder scoring by shared-term count: deterministic and good enough
/// to observe rerank-driven reordering in tests.
pub struct OverlapCrossEncoder;

impl ICrossEncoder for OverlapCrossEncoder {
    fn score_pairs(&self, question: &str, passages: &[String]) -> TomeResult<Vec<f64>> {
        let q_terms: Vec<String> = question
            .to_lowercase()
            .split_whitespace()
            .map(String::from)
            .collect();
        Ok(passages
            .iter()
            .map(|p| {
                let p_lower = p.to_lowercase();
                q_terms.iter().filter(|t| p_lower.contains(*t)).count() as f64
            })
            .collect())
    }

    fn name(&self) -> &str {
        "overlap-mock"
    }
}

/// A cross-encoder that always fails, for exercising rerank degradation.
pub struct FailingCrossEncoder;

impl ICrossEncoder for FailingCrossEncoder {
    fn score_pairs(&self, _question: &str, _passages: &[String]) -> TomeResult<Vec<f64>> {
        Err(ReasoningError::CallFailed {
            reason: "cross-encoder backend down".to_string(),
        }
        .into())
    }

    fn name(&self) -> &str {
        "failing-mock"
    }
}

/// Default per-call timeout for mocks in tests.
pub fn test_timeout() -> Duration {
    Duration::from_secs(1)
}
