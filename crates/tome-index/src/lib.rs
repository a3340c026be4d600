//! # tome-index
//!
//! In-memory document index for one session. Documents are only ever added,
//! and every addition builds a fresh immutable [`IndexSnapshot`]; readers that
//! captured the previous snapshot keep it until they finish. There is no
//! query-time locking beyond one `Arc` clone.

mod dense;
mod embedder;
mod snapshot;
mod sparse;
mod store;

pub use embedder::HashedBowEmbedder;
pub use snapshot::IndexSnapshot;
pub use store::SessionIndex;
