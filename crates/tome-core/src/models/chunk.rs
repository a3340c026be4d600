//! The retrievable text unit.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Structured metadata flags set at ingestion by the entity tagger.
///
/// These power exhaustive retrieval: a counting question about projects scans
/// every chunk with `contains_projects = true` instead of trusting a top-K cut.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkFlags {
    pub contains_projects: bool,
    pub contains_people: bool,
    pub contains_dates: bool,
    pub contains_locations: bool,
    /// Optional document category (e.g. "budget", "timeline").
    pub category: Option<String>,
}

/// A retrievable text unit. Immutable: created at ingestion, destroyed with
/// the session. Embeddings live in the index snapshot, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub id: String,
    /// Source document name, e.g. "Budget.pdf".
    pub document_name: String,
    /// Position of the chunk within its source document.
    pub position: usize,
    pub text: String,
    pub flags: ChunkFlags,
    /// Ingestion batch this chunk arrived in.
    pub batch_id: Uuid,
    /// blake3 of the normalized text, hex-encoded. Exact-duplicate fast path.
    pub fingerprint: String,
}

impl Chunk {
    pub fn new(
        id: impl Into<String>,
        document_name: impl Into<String>,
        position: usize,
        text: impl Into<String>,
        flags: ChunkFlags,
        batch_id: Uuid,
    ) -> Self {
        let text = text.into();
        let fingerprint = Self::compute_fingerprint(&text);
        Self {
            id: id.into(),
            document_name: document_name.into(),
            position,
            text,
            flags,
            batch_id,
            fingerprint,
        }
    }

    /// Fingerprint of the whitespace-normalized, lowercased text.
    pub fn compute_fingerprint(text: &str) -> String {
        let normalized = text
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(" ");
        blake3::hash(normalized.as_bytes()).to_hex().to_string()
    }
}
